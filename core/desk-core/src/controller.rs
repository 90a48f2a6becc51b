//! Orchestrates the session lifecycle, display connectivity, and the
//! shutdown gate into view directives.
//!
//! Single-threaded, run-to-completion: every entry point takes
//! `&mut self` and finishes synchronously before the next event is
//! processed, so there are no locks and no queues. The embedder routes
//! collaborator callbacks into the `handle_*` methods; the listening
//! flags guarantee that events delivered after `deactivate` are dropped.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use desk_protocol::{
    Directive, DisplayEvent, DisplayHandle, DisplayId, SessionSignal, SessionSnapshot, SessionState,
};

use crate::display::DisplayTracker;
use crate::gate::{GateDecision, ShutdownGate};
use crate::lifecycle::{SessionLifecycle, Transition};
use crate::presentation;

/// The external desktop session manager. Commands are fire-and-forget;
/// the event stream reports the actual outcome later.
pub trait SessionManager {
    /// Synchronous authoritative query.
    fn is_session_running(&self) -> bool;
    fn start_session(&mut self);
    fn stop_session(&mut self);
    /// Registers for the state event stream. Called at most once per
    /// activation; real implementations register their platform listener
    /// here.
    fn subscribe(&mut self);
    fn unsubscribe(&mut self);
}

/// The display subsystem.
pub trait DisplayService {
    /// All currently attached external-class displays. An empty or
    /// failed enumeration reads as "no external display".
    fn enumerate_external_displays(&self) -> Vec<DisplayHandle>;
    fn display(&self, id: DisplayId) -> Option<DisplayHandle>;
    fn subscribe(&mut self);
    fn unsubscribe(&mut self);
}

/// Modal confirmation collaborator. Exactly one prompt is raised per
/// outstanding confirmation; its outcome returns through
/// [`SessionSynchronizer::on_confirmation_resolved`].
pub trait ConfirmationPrompt {
    fn request_confirmation(&mut self);
}

/// The view layer: consumes each recomputed directive.
pub trait DirectiveSink {
    fn apply(&mut self, directive: &Directive);
}

pub struct SessionSynchronizer<M, D, P> {
    manager: M,
    displays: D,
    prompt: P,
    view: Option<Box<dyn DirectiveSink>>,
    lifecycle: SessionLifecycle,
    tracker: DisplayTracker,
    gate: ShutdownGate,
    manager_listening: bool,
    display_listening: bool,
    state_changed_at: DateTime<Utc>,
    directive: Directive,
}

impl<M, D, P> SessionSynchronizer<M, D, P>
where
    M: SessionManager,
    D: DisplayService,
    P: ConfirmationPrompt,
{
    /// Resolves the initial state from the manager's authoritative query;
    /// it is never assumed.
    pub fn new(manager: M, displays: D, prompt: P) -> Self {
        let initial = if manager.is_session_running() {
            SessionState::Running
        } else {
            SessionState::Stopped
        };
        let mut tracker = DisplayTracker::new();
        tracker.resync(displays.enumerate_external_displays());
        let directive = presentation::derive(initial, initial, tracker.is_connected());

        Self {
            manager,
            displays,
            prompt,
            view: None,
            lifecycle: SessionLifecycle::new(initial),
            tracker,
            gate: ShutdownGate::new(),
            manager_listening: false,
            display_listening: false,
            state_changed_at: Utc::now(),
            directive,
        }
    }

    /// Subscribes to both collaborator streams and performs the full
    /// resync. Idempotent: a second activation is a no-op apart from the
    /// resync.
    pub fn activate(&mut self) {
        if !self.manager_listening {
            self.manager.subscribe();
            self.manager_listening = true;
        }
        if !self.display_listening {
            self.displays.subscribe();
            self.display_listening = true;
        }
        self.resync();
    }

    /// Unsubscribes from both streams. Idempotent. Events delivered
    /// afterwards are dropped by the listening flags, so no callback can
    /// mutate state once this returns.
    pub fn deactivate(&mut self) {
        if self.manager_listening {
            self.manager.unsubscribe();
            self.manager_listening = false;
        }
        if self.display_listening {
            self.displays.unsubscribe();
            self.display_listening = false;
        }
    }

    /// User flipped the toggle.
    pub fn on_toggle(&mut self, requested_on: bool) {
        if requested_on {
            if let Some(transition) = self.lifecycle.request_start() {
                // Optimistic: move to Starting before the manager
                // confirms so the user gets immediate feedback.
                self.manager.start_session();
                self.apply_user_transition(transition);
            } else {
                self.push_directive();
            }
            return;
        }

        let currently_on = self.directive.toggle_on;
        match self
            .gate
            .evaluate(currently_on, requested_on, self.lifecycle.state())
        {
            GateDecision::Allow => {
                if let Some(transition) = self.lifecycle.request_stop() {
                    self.manager.stop_session();
                    self.apply_user_transition(transition);
                } else {
                    self.push_directive();
                }
            }
            GateDecision::Prompt => {
                debug!("Shutdown confirmation requested");
                self.prompt.request_confirmation();
                // Hold the toggle at its prior position until resolved.
                self.push_directive();
            }
            GateDecision::Hold => self.push_directive(),
        }
    }

    /// Outcome of the confirmation prompt. Resolving when nothing is
    /// pending is a no-op.
    pub fn on_confirmation_resolved(&mut self, confirmed: bool) {
        if confirmed {
            if self.gate.on_confirmed() {
                info!("Session shutdown confirmed");
                // Re-drive the toggle-off; the approval lets it through
                // the gate exactly once.
                self.on_toggle(false);
            }
        } else if self.gate.on_cancelled() {
            debug!("Session shutdown cancelled");
            // Restore the toggle to its held position.
            self.push_directive();
        }
    }

    /// One event from the manager's state stream.
    pub fn handle_session_signal(&mut self, signal: SessionSignal) {
        if !self.manager_listening {
            return;
        }
        let Some(transition) = self.lifecycle.apply_signal(signal) else {
            return;
        };
        // The change did not originate from the user's toggle, so any
        // outstanding confirmation is stale and must not fire later.
        self.gate.supersede();
        self.note_transition(&transition, "external");
        self.emit(presentation::derive(
            transition.current,
            transition.previous,
            self.tracker.is_connected(),
        ));
    }

    /// One hotplug event from the display subsystem.
    pub fn handle_display_event(&mut self, event: DisplayEvent) {
        if !self.display_listening {
            return;
        }
        let change = match event {
            DisplayEvent::Added(id) => match self.displays.display(id) {
                Some(handle) => self.tracker.on_display_added(&handle),
                None => None,
            },
            DisplayEvent::Removed(id) => self.tracker.on_display_removed(id),
            DisplayEvent::Changed(_) => None,
        };
        let Some(change) = change else { return };

        debug!(change = ?change, "External display connectivity changed");
        let current = self.lifecycle.state();
        self.emit(presentation::derive(
            current,
            current,
            self.tracker.is_connected(),
        ));
    }

    /// Attaches the view layer and pushes the current directive so it
    /// renders without waiting for the next event.
    pub fn attach_view(&mut self, view: impl DirectiveSink + 'static) {
        let mut view: Box<dyn DirectiveSink> = Box::new(view);
        view.apply(&self.directive);
        self.view = Some(view);
    }

    pub fn detach_view(&mut self) -> Option<Box<dyn DirectiveSink>> {
        self.view.take()
    }

    pub fn state(&self) -> SessionState {
        self.lifecycle.state()
    }

    pub fn display_connected(&self) -> bool {
        self.tracker.is_connected()
    }

    pub fn directive(&self) -> &Directive {
        &self.directive
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.lifecycle.state(),
            display_connected: self.tracker.is_connected(),
            state_changed_at: self.state_changed_at,
            directive: self.directive.clone(),
        }
    }

    /// Full resync with both collaborators: state may have moved while
    /// we were not listening. Emits exactly one directive, derived with
    /// `previous == current` since any missed transitions are unknowable.
    fn resync(&mut self) {
        let settled = if self.manager.is_session_running() {
            SessionState::Running
        } else {
            SessionState::Stopped
        };
        if let Some(transition) = self.lifecycle.resync(settled) {
            // Authoritative correction; a confirmation pending from
            // before the gap is stale.
            self.gate.supersede();
            self.note_transition(&transition, "resync");
        }
        self.tracker.resync(self.displays.enumerate_external_displays());

        let current = self.lifecycle.state();
        self.emit(presentation::derive(
            current,
            current,
            self.tracker.is_connected(),
        ));
    }

    fn apply_user_transition(&mut self, transition: Transition) {
        self.note_transition(&transition, "user");
        self.emit(presentation::derive(
            transition.current,
            transition.previous,
            self.tracker.is_connected(),
        ));
    }

    fn note_transition(&mut self, transition: &Transition, origin: &str) {
        self.state_changed_at = Utc::now();
        info!(
            previous = transition.previous.as_str(),
            current = transition.current.as_str(),
            origin,
            "Session state transition"
        );
    }

    fn emit(&mut self, directive: Directive) {
        if let Some(view) = self.view.as_mut() {
            view.apply(&directive);
        }
        self.directive = directive;
    }

    /// Re-pushes the held directive, reverting any view-side toggle
    /// movement that was not accepted.
    fn push_directive(&mut self) {
        if let Some(view) = self.view.as_mut() {
            view.apply(&self.directive);
        }
    }
}
