//! External display connectivity tracking.
//!
//! Collapses the hotplug stream into a single "is an external display
//! present" bit. First-seen wins: the tracker latches onto the first
//! external display it observes and ignores later arrivals until that
//! one departs.

use desk_protocol::{DisplayHandle, DisplayId};

/// Connectivity edge produced by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayChange {
    Attached,
    Detached,
}

#[derive(Debug, Default)]
pub struct DisplayTracker {
    tracked: Option<DisplayId>,
}

impl DisplayTracker {
    pub fn new() -> Self {
        Self { tracked: None }
    }

    pub fn is_connected(&self) -> bool {
        self.tracked.is_some()
    }

    /// Adopts the display iff nothing is tracked yet and it is
    /// external-class. Yields `Attached` exactly once per
    /// untracked -> tracked edge.
    pub fn on_display_added(&mut self, display: &DisplayHandle) -> Option<DisplayChange> {
        if self.tracked.is_some() || !display.kind.is_external() {
            return None;
        }
        self.tracked = Some(display.id);
        Some(DisplayChange::Attached)
    }

    /// Clears tracking iff `id` is the tracked display. Removal of any
    /// other display is a no-op, even an external one that arrived later.
    pub fn on_display_removed(&mut self, id: DisplayId) -> Option<DisplayChange> {
        if self.tracked != Some(id) {
            return None;
        }
        self.tracked = None;
        Some(DisplayChange::Detached)
    }

    /// Authoritative recomputation, used after a period of not listening.
    /// Adopts the first external display in the enumeration (or none)
    /// without yielding a change event.
    pub fn resync<I>(&mut self, displays: I)
    where
        I: IntoIterator<Item = DisplayHandle>,
    {
        self.tracked = displays
            .into_iter()
            .find(|display| display.kind.is_external())
            .map(|display| display.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desk_protocol::DisplayKind;

    fn external(id: u32) -> DisplayHandle {
        DisplayHandle {
            id: DisplayId(id),
            kind: DisplayKind::External,
        }
    }

    fn built_in(id: u32) -> DisplayHandle {
        DisplayHandle {
            id: DisplayId(id),
            kind: DisplayKind::BuiltIn,
        }
    }

    #[test]
    fn first_external_display_wins() {
        let mut tracker = DisplayTracker::new();

        assert_eq!(
            tracker.on_display_added(&external(2)),
            Some(DisplayChange::Attached)
        );
        assert_eq!(tracker.on_display_added(&external(3)), None);
        assert!(tracker.is_connected());

        // Removing the tracked display disconnects even though another
        // external display is still attached.
        assert_eq!(
            tracker.on_display_removed(DisplayId(2)),
            Some(DisplayChange::Detached)
        );
        assert!(!tracker.is_connected());
        assert_eq!(tracker.on_display_removed(DisplayId(3)), None);
    }

    #[test]
    fn non_external_displays_are_ignored() {
        let mut tracker = DisplayTracker::new();
        assert_eq!(tracker.on_display_added(&built_in(0)), None);
        assert!(!tracker.is_connected());
    }

    #[test]
    fn removal_of_untracked_display_is_noop() {
        let mut tracker = DisplayTracker::new();
        tracker.on_display_added(&external(2));
        assert_eq!(tracker.on_display_removed(DisplayId(9)), None);
        assert!(tracker.is_connected());
    }

    #[test]
    fn resync_is_silent_and_authoritative() {
        let mut tracker = DisplayTracker::new();
        tracker.on_display_added(&external(2));

        // Tracked display went away while we were not listening.
        tracker.resync([built_in(0)]);
        assert!(!tracker.is_connected());

        tracker.resync([built_in(0), external(5), external(6)]);
        assert!(tracker.is_connected());
        assert_eq!(tracker.on_display_removed(DisplayId(5)), Some(DisplayChange::Detached));
    }

    #[test]
    fn resync_with_empty_enumeration_disconnects() {
        let mut tracker = DisplayTracker::new();
        tracker.on_display_added(&external(2));
        tracker.resync(std::iter::empty());
        assert!(!tracker.is_connected());
    }
}
