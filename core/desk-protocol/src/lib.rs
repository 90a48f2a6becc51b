//! Contract types for the Deskside session synchronizer.
//!
//! This crate is shared by the synchronizer core and its clients (view
//! layers, embedders) to prevent schema drift. The core remains the
//! authority on state transitions; clients only consume the derived types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of the desktop session. Exactly one state is active at a
/// time; the external session manager is the source of truth and the
/// synchronizer adopts whatever it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Stopped => "stopped",
            SessionState::Starting => "starting",
            SessionState::Running => "running",
            SessionState::Stopping => "stopping",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "stopped" => Some(SessionState::Stopped),
            "starting" => Some(SessionState::Starting),
            "running" => Some(SessionState::Running),
            "stopping" => Some(SessionState::Stopping),
            _ => None,
        }
    }
}

/// One event from the external manager's state stream.
///
/// Managers differ in granularity: some emit discrete running/stopped
/// edges, others push the full state they changed to. Both normalize to
/// a target [`SessionState`] via [`SessionSignal::target_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSignal {
    Running,
    Stopped,
    StateChanged(SessionState),
}

impl SessionSignal {
    pub fn target_state(&self) -> SessionState {
        match self {
            SessionSignal::Running => SessionState::Running,
            SessionSignal::Stopped => SessionState::Stopped,
            SessionSignal::StateChanged(state) => *state,
        }
    }
}

/// Opaque identifier the display subsystem assigns to a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayId(pub u32);

impl std::fmt::Display for DisplayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category tag the display subsystem attaches to each display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayKind {
    BuiltIn,
    External,
    Wireless,
    Overlay,
    Virtual,
}

impl DisplayKind {
    /// Only externally attached physical displays count for desktop
    /// connectivity; wireless and virtual displays do not.
    pub fn is_external(&self) -> bool {
        matches!(self, DisplayKind::External)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayHandle {
    pub id: DisplayId,
    pub kind: DisplayKind,
}

/// Hotplug notification from the display subsystem. `Changed` is carried
/// for completeness and ignored by the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayEvent {
    Added(DisplayId),
    Removed(DisplayId),
    Changed(DisplayId),
}

/// Status line shown in the center of the control surface. The keys are
/// stable; clients map them to localized copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMessage {
    Starting,
    Stopping,
    Stopped,
    StartFailed,
    Crashed,
    Running,
    RunningBackground,
    StopFailed,
}

impl StatusMessage {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusMessage::Starting => "starting",
            StatusMessage::Stopping => "stopping",
            StatusMessage::Stopped => "stopped",
            StatusMessage::StartFailed => "start_failed",
            StatusMessage::Crashed => "crashed",
            StatusMessage::Running => "running",
            StatusMessage::RunningBackground => "running_background",
            StatusMessage::StopFailed => "stop_failed",
        }
    }
}

/// Secondary hint line under the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintMessage {
    AutoStart,
    SwitchDisplays,
}

impl HintMessage {
    pub fn as_str(&self) -> &'static str {
        match self {
            HintMessage::AutoStart => "auto_start",
            HintMessage::SwitchDisplays => "switch_displays",
        }
    }
}

/// The complete, derived description of what the view layer should
/// currently display. A `None` hint means the hint line is hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub toggle_on: bool,
    pub toggle_enabled: bool,
    pub status: StatusMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<HintMessage>,
}

/// Point-in-time view of the synchronizer for clients that poll rather
/// than subscribe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub display_connected: bool,
    pub state_changed_at: DateTime<Utc>,
    pub directive: Directive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_state_round_trips_through_str() {
        for state in [
            SessionState::Stopped,
            SessionState::Starting,
            SessionState::Running,
            SessionState::Stopping,
        ] {
            assert_eq!(SessionState::from_str(state.as_str()), Some(state));
        }
    }

    #[test]
    fn rejects_unknown_state_string() {
        assert_eq!(SessionState::from_str("paused"), None);
        assert_eq!(SessionState::from_str(""), None);
    }

    #[test]
    fn signals_normalize_to_target_state() {
        assert_eq!(SessionSignal::Running.target_state(), SessionState::Running);
        assert_eq!(SessionSignal::Stopped.target_state(), SessionState::Stopped);
        assert_eq!(
            SessionSignal::StateChanged(SessionState::Starting).target_state(),
            SessionState::Starting
        );
    }

    #[test]
    fn only_external_displays_count() {
        assert!(DisplayKind::External.is_external());
        for kind in [
            DisplayKind::BuiltIn,
            DisplayKind::Wireless,
            DisplayKind::Overlay,
            DisplayKind::Virtual,
        ] {
            assert!(!kind.is_external());
        }
    }

    #[test]
    fn directive_omits_hidden_hint() {
        let directive = Directive {
            toggle_on: true,
            toggle_enabled: true,
            status: StatusMessage::Running,
            hint: None,
        };
        let json = serde_json::to_value(&directive).expect("serialize directive");
        assert!(json.get("hint").is_none());

        let shown = Directive {
            hint: Some(HintMessage::SwitchDisplays),
            ..directive
        };
        let json = serde_json::to_value(&shown).expect("serialize directive");
        assert_eq!(json["hint"], "switch_displays");
    }
}
