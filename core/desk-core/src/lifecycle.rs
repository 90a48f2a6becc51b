//! Session lifecycle state machine.
//!
//! User commands move the machine optimistically (`Stopped -> Starting`,
//! `Running -> Stopping`) before the external manager confirms. External
//! signals are authoritative and adopted from any state; that one rule
//! realizes the failure arrows (start failure, crash, stop failure) as
//! ordinary transitions, distinguished downstream by their context.

use desk_protocol::{SessionSignal, SessionState};

/// Ephemeral context for one applied transition. It is consumed by the
/// presentation step immediately and never retained across events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub previous: SessionState,
    pub current: SessionState,
}

#[derive(Debug)]
pub struct SessionLifecycle {
    state: SessionState,
}

impl SessionLifecycle {
    /// The initial state always comes from an authoritative manager
    /// query; it is never assumed.
    pub fn new(initial: SessionState) -> Self {
        Self { state: initial }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// User start command. Accepted only from `Stopped`; the caller must
    /// not issue a manager command when this returns `None`.
    pub fn request_start(&mut self) -> Option<Transition> {
        if self.state != SessionState::Stopped {
            return None;
        }
        self.adopt(SessionState::Starting)
    }

    /// User stop command, already past the shutdown gate. Accepted only
    /// from `Running`.
    pub fn request_stop(&mut self) -> Option<Transition> {
        if self.state != SessionState::Running {
            return None;
        }
        self.adopt(SessionState::Stopping)
    }

    /// External signal: authoritative, adopted from any state without
    /// legality checks. `None` when the reported state equals the
    /// current one.
    pub fn apply_signal(&mut self, signal: SessionSignal) -> Option<Transition> {
        self.adopt(signal.target_state())
    }

    /// Authoritative resync, used at activation when events may have
    /// been missed while not listening.
    pub fn resync(&mut self, state: SessionState) -> Option<Transition> {
        self.adopt(state)
    }

    fn adopt(&mut self, next: SessionState) -> Option<Transition> {
        if self.state == next {
            return None;
        }
        let previous = self.state;
        self.state = next;
        Some(Transition {
            previous,
            current: next,
        })
    }
}
