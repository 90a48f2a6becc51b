//! Shutdown confirmation gate.
//!
//! Turning off a running session is destructive, so the gate vetoes the
//! toggle until the user confirms. External transitions never pass
//! through the gate; the controller supersedes any outstanding
//! confirmation when one lands, so a stale confirmation cannot fire
//! after the state has already moved underneath it.

use desk_protocol::SessionState;

/// Outcome of evaluating a requested toggle change against the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Proceed with the requested change.
    Allow,
    /// Veto the change and raise the confirmation prompt.
    Prompt,
    /// Veto the change; a prompt is already outstanding.
    Hold,
}

#[derive(Debug, Default)]
pub struct ShutdownGate {
    pending: bool,
    approved: bool,
}

impl ShutdownGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Evaluates a requested toggle change. Only a toggle-off of a
    /// `Running` session is gated; everything else passes.
    pub fn evaluate(
        &mut self,
        currently_on: bool,
        requested_on: bool,
        state: SessionState,
    ) -> GateDecision {
        let attempted_shutdown = currently_on && !requested_on && state == SessionState::Running;
        if !attempted_shutdown {
            return GateDecision::Allow;
        }
        if self.approved {
            // One approval covers exactly one attempt.
            self.approved = false;
            return GateDecision::Allow;
        }
        if self.pending {
            return GateDecision::Hold;
        }
        self.pending = true;
        GateDecision::Prompt
    }

    /// Resolves the outstanding confirmation positively and pre-approves
    /// the next toggle-off evaluation. Returns whether a confirmation was
    /// outstanding; redundant resolution is a no-op.
    pub fn on_confirmed(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.approved = true;
        true
    }

    /// Resolves the outstanding confirmation negatively. Returns whether
    /// a confirmation was outstanding; no other state changes.
    pub fn on_cancelled(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        true
    }

    /// Discards any pending or approved confirmation. Called when an
    /// authoritative external transition supersedes the user's attempt.
    pub fn supersede(&mut self) {
        self.pending = false;
        self.approved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_off_of_running_session_requires_confirmation() {
        let mut gate = ShutdownGate::new();
        assert_eq!(
            gate.evaluate(true, false, SessionState::Running),
            GateDecision::Prompt
        );
        assert!(gate.is_pending());

        // A second attempt before resolution is vetoed without raising
        // another prompt.
        assert_eq!(
            gate.evaluate(true, false, SessionState::Running),
            GateDecision::Hold
        );
    }

    #[test]
    fn confirmation_approves_exactly_one_attempt() {
        let mut gate = ShutdownGate::new();
        gate.evaluate(true, false, SessionState::Running);
        assert!(gate.on_confirmed());

        assert_eq!(
            gate.evaluate(true, false, SessionState::Running),
            GateDecision::Allow
        );
        // The approval was consumed; the next attempt prompts again.
        assert_eq!(
            gate.evaluate(true, false, SessionState::Running),
            GateDecision::Prompt
        );
    }

    #[test]
    fn cancel_clears_pending_without_approval() {
        let mut gate = ShutdownGate::new();
        gate.evaluate(true, false, SessionState::Running);
        assert!(gate.on_cancelled());
        assert!(!gate.is_pending());
        assert_eq!(
            gate.evaluate(true, false, SessionState::Running),
            GateDecision::Prompt
        );
    }

    #[test]
    fn redundant_resolution_is_noop() {
        let mut gate = ShutdownGate::new();
        assert!(!gate.on_confirmed());
        assert!(!gate.on_cancelled());
        assert_eq!(
            gate.evaluate(true, false, SessionState::Running),
            GateDecision::Prompt
        );
    }

    #[test]
    fn non_shutdown_changes_pass_through() {
        let mut gate = ShutdownGate::new();
        // Toggle-on is never gated.
        assert_eq!(
            gate.evaluate(false, true, SessionState::Stopped),
            GateDecision::Allow
        );
        // Toggle-off outside Running is never gated.
        assert_eq!(
            gate.evaluate(true, false, SessionState::Starting),
            GateDecision::Allow
        );
        assert!(!gate.is_pending());
    }

    #[test]
    fn supersede_discards_pending_and_approval() {
        let mut gate = ShutdownGate::new();
        gate.evaluate(true, false, SessionState::Running);
        gate.supersede();
        assert!(!gate.is_pending());
        assert!(!gate.on_confirmed());

        gate.evaluate(true, false, SessionState::Running);
        gate.on_confirmed();
        gate.supersede();
        // The approval is gone too; a fresh attempt prompts.
        assert_eq!(
            gate.evaluate(true, false, SessionState::Running),
            GateDecision::Prompt
        );
    }
}
