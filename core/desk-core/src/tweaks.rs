//! Experimental display tweaks persisted as key/value flags.
//!
//! The flag surface mirrors a device property space: a key that is
//! absent means the device does not support the tweak at all, so the
//! control is hidden rather than shown disabled. Missing files read as
//! an empty property space.

use std::collections::BTreeMap;
use std::path::PathBuf;

use fs_err as fs;

use crate::error::{DeskError, Result};

/// Ask the display pipeline to prefer the attached display's native mode
/// over the default output mode.
pub const KEY_NATIVE_MODE: &str = "display.try_native_mode";

/// Persisted key/value flag surface backing the tweaks screen.
pub trait PropertyStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// JSON-file-backed property store, by default at
/// `~/.deskside/tweaks.json`.
#[derive(Debug)]
pub struct FilePropertyStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePropertyStore {
    pub fn open_default() -> Result<Self> {
        let home = dirs::home_dir().ok_or(DeskError::HomeDirNotFound)?;
        Self::open(home.join(".deskside").join("tweaks.json"))
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|err| DeskError::ConfigMalformed {
                    path: path.clone(),
                    details: err.to_string(),
                })?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(DeskError::Io {
                    context: format!("reading {}", path.display()),
                    source: err,
                })
            }
        };
        Ok(Self { path, values })
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| DeskError::Io {
                context: format!("creating {}", parent.display()),
                source: err,
            })?;
        }
        let content =
            serde_json::to_string_pretty(&self.values).map_err(|err| DeskError::ConfigMalformed {
                path: self.path.clone(),
                details: err.to_string(),
            })?;
        fs::write(&self.path, content).map_err(|err| DeskError::ConfigWriteFailed {
            path: self.path.clone(),
            source: err,
        })
    }
}

impl PropertyStore for FilePropertyStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

/// In-memory store for embedders that manage their own property space.
#[derive(Debug, Default)]
pub struct MemoryPropertyStore {
    values: BTreeMap<String, String>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(values: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl PropertyStore for MemoryPropertyStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flag logic behind the experimental tweaks screen.
pub struct DisplayTweaks<S: PropertyStore> {
    store: S,
}

impl<S: PropertyStore> DisplayTweaks<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The tweak exists only on devices that expose the key at all.
    pub fn native_mode_available(&self) -> bool {
        self.store.get(KEY_NATIVE_MODE).is_some()
    }

    pub fn native_mode_enabled(&self) -> bool {
        self.store.get(KEY_NATIVE_MODE).as_deref() == Some("1")
    }

    /// Writes the flag; a no-op on devices where the tweak is
    /// unavailable.
    pub fn set_native_mode(&mut self, enabled: bool) -> Result<()> {
        if !self.native_mode_available() {
            return Ok(());
        }
        self.store.set(KEY_NATIVE_MODE, if enabled { "1" } else { "0" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_unavailable() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store =
            FilePropertyStore::open(temp.path().join("tweaks.json")).expect("open store");
        let tweaks = DisplayTweaks::new(store);
        assert!(!tweaks.native_mode_available());
        assert!(!tweaks.native_mode_enabled());
    }

    #[test]
    fn set_when_unavailable_is_noop() {
        let mut tweaks = DisplayTweaks::new(MemoryPropertyStore::new());
        tweaks.set_native_mode(true).expect("set flag");
        assert!(!tweaks.native_mode_available());
        assert!(!tweaks.native_mode_enabled());
    }

    #[test]
    fn flag_round_trips_through_file() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("nested").join("tweaks.json");

        let mut store = FilePropertyStore::open(&path).expect("open store");
        store.set(KEY_NATIVE_MODE, "0").expect("seed key");

        let mut tweaks = DisplayTweaks::new(store);
        assert!(tweaks.native_mode_available());
        assert!(!tweaks.native_mode_enabled());

        tweaks.set_native_mode(true).expect("enable");
        assert!(tweaks.native_mode_enabled());

        // Reopen from disk and observe the persisted value.
        let store = FilePropertyStore::open(&path).expect("reopen store");
        let tweaks = DisplayTweaks::new(store);
        assert!(tweaks.native_mode_enabled());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("tweaks.json");
        std::fs::write(&path, "not json").expect("write file");

        let err = FilePropertyStore::open(&path).expect_err("malformed file");
        assert!(matches!(err, DeskError::ConfigMalformed { .. }));
    }

    #[test]
    fn seeded_memory_store_exposes_flag() {
        let store = MemoryPropertyStore::seeded([(KEY_NATIVE_MODE.to_string(), "1".to_string())]);
        let tweaks = DisplayTweaks::new(store);
        assert!(tweaks.native_mode_available());
        assert!(tweaks.native_mode_enabled());
    }
}
