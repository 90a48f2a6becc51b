//! # desk-core
//!
//! Session state synchronizer for the Deskside desktop control surface:
//! tracks the desktop session's lifecycle and external display
//! connectivity, derives everything the view shows from that state, and
//! gates session shutdown behind an explicit confirmation.
//!
//! ## Design Principles
//!
//! - **Synchronous**: every entry point runs to completion; no async
//!   runtime dependency.
//! - **Not thread-safe**: events are expected on one logical execution
//!   context; embedders provide their own synchronization if they need
//!   it.
//! - **Collaborators behind traits**: the session manager, display
//!   subsystem, confirmation prompt, and view layer are injected, so the
//!   core is testable with in-memory fakes.
//! - **Derived, never stored**: session state is re-read from the live
//!   manager on activation; the view directive is a pure function of the
//!   current snapshot.

// Public modules
pub mod controller;
pub mod display;
pub mod error;
pub mod gate;
pub mod lifecycle;
pub mod presentation;
pub mod tweaks;

// Re-export commonly used items at crate root
pub use controller::{
    ConfirmationPrompt, DirectiveSink, DisplayService, SessionManager, SessionSynchronizer,
};
pub use display::{DisplayChange, DisplayTracker};
pub use error::{DeskError, Result};
pub use gate::{GateDecision, ShutdownGate};
pub use lifecycle::{SessionLifecycle, Transition};
pub use tweaks::{DisplayTweaks, FilePropertyStore, MemoryPropertyStore, PropertyStore};
