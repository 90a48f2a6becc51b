//! Derives the complete view directive from a state snapshot.
//!
//! Pure and deterministic: identical inputs always produce the identical
//! directive, which makes the whole table testable. The previous state
//! distinguishes a clean stop from a start failure or a crash, and a
//! clean start from a stop failure; callers pass `previous == current`
//! for refreshes that are not driven by a transition.

use desk_protocol::{Directive, HintMessage, SessionState, StatusMessage};

pub fn derive(
    state: SessionState,
    previous: SessionState,
    display_connected: bool,
) -> Directive {
    match state {
        SessionState::Starting => Directive {
            toggle_on: true,
            toggle_enabled: false,
            status: StatusMessage::Starting,
            hint: None,
        },
        SessionState::Stopping => Directive {
            toggle_on: false,
            toggle_enabled: false,
            status: StatusMessage::Stopping,
            hint: None,
        },
        SessionState::Stopped => {
            let (status, hint) = match previous {
                SessionState::Starting => (StatusMessage::StartFailed, None),
                SessionState::Running => (StatusMessage::Crashed, None),
                SessionState::Stopping | SessionState::Stopped => {
                    if display_connected {
                        (StatusMessage::Stopped, None)
                    } else {
                        // With no display attached the session will start
                        // automatically when one is plugged in.
                        (StatusMessage::Stopped, Some(HintMessage::AutoStart))
                    }
                }
            };
            Directive {
                toggle_on: false,
                toggle_enabled: true,
                status,
                hint,
            }
        }
        SessionState::Running => {
            let (status, hint) = match previous {
                SessionState::Stopping => (StatusMessage::StopFailed, None),
                // `previous == Stopped` only occurs on an authoritative
                // jump; it reads as a clean running state.
                _ => {
                    if display_connected {
                        (StatusMessage::Running, None)
                    } else {
                        (
                            StatusMessage::RunningBackground,
                            Some(HintMessage::SwitchDisplays),
                        )
                    }
                }
            };
            Directive {
                toggle_on: true,
                toggle_enabled: true,
                status,
                hint,
            }
        }
    }
}
