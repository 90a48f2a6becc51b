//! Error types for desk-core operations.
//!
//! The synchronizer itself cannot fail: its collaborators either deliver
//! a value or have nothing to report. The only fallible surface is the
//! persisted tweaks store.

use std::path::PathBuf;

/// All errors that can occur in desk-core operations.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error("Tweaks file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("Tweaks file write failed: {path}: {source}")]
    ConfigWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Home directory not found")]
    HomeDirNotFound,
}

/// Convenience type alias for Results using DeskError.
pub type Result<T> = std::result::Result<T, DeskError>;
