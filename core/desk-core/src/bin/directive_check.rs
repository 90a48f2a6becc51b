//! Debug utility for inspecting the directive derivation table and
//! replaying the background-start flow against in-memory collaborators.

use std::env;

use tracing_subscriber::EnvFilter;

use desk_core::controller::{
    ConfirmationPrompt, DisplayService, SessionManager, SessionSynchronizer,
};
use desk_core::presentation;
use desk_protocol::{Directive, DisplayHandle, DisplayId, SessionSignal, SessionState};

struct ScriptedManager {
    running: bool,
}

impl SessionManager for ScriptedManager {
    fn is_session_running(&self) -> bool {
        self.running
    }

    fn start_session(&mut self) {
        println!("  -> manager command: start_session");
    }

    fn stop_session(&mut self) {
        println!("  -> manager command: stop_session");
    }

    fn subscribe(&mut self) {}

    fn unsubscribe(&mut self) {}
}

struct NoDisplays;

impl DisplayService for NoDisplays {
    fn enumerate_external_displays(&self) -> Vec<DisplayHandle> {
        Vec::new()
    }

    fn display(&self, _id: DisplayId) -> Option<DisplayHandle> {
        None
    }

    fn subscribe(&mut self) {}

    fn unsubscribe(&mut self) {}
}

struct PrintingPrompt;

impl ConfirmationPrompt for PrintingPrompt {
    fn request_confirmation(&mut self) {
        println!("  -> confirmation prompt raised");
    }
}

const STATES: [SessionState; 4] = [
    SessionState::Stopped,
    SessionState::Starting,
    SessionState::Running,
    SessionState::Stopping,
];

fn main() {
    init_logging();

    println!("═══════════════════════════════════════════════════════════");
    println!("  Deskside Directive Check - Validation Harness");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    println!("── Derivation Table ──────────────────────────────────────");
    println!(
        "  {:<9} {:<9} {:<10} {:<7} {:<8} {:<19} hint",
        "state", "previous", "connected", "toggle", "enabled", "status"
    );
    for state in STATES {
        for previous in STATES {
            for connected in [false, true] {
                let directive = presentation::derive(state, previous, connected);
                print_row(state, previous, connected, &directive);
            }
        }
    }
    println!();

    println!("── Background Start Replay ───────────────────────────────");
    let mut sync = SessionSynchronizer::new(
        ScriptedManager { running: false },
        NoDisplays,
        PrintingPrompt,
    );
    sync.activate();
    print_step("activated", &sync.snapshot().directive);

    sync.on_toggle(true);
    print_step("toggle on", sync.directive());

    sync.handle_session_signal(SessionSignal::Running);
    print_step("manager reports running", sync.directive());

    sync.on_toggle(false);
    print_step("toggle off (gated)", sync.directive());

    sync.on_confirmation_resolved(true);
    print_step("shutdown confirmed", sync.directive());

    sync.handle_session_signal(SessionSignal::Stopped);
    print_step("manager reports stopped", sync.directive());
}

fn print_row(state: SessionState, previous: SessionState, connected: bool, d: &Directive) {
    println!(
        "  {:<9} {:<9} {:<10} {:<7} {:<8} {:<19} {}",
        state.as_str(),
        previous.as_str(),
        connected,
        d.toggle_on,
        d.toggle_enabled,
        d.status.as_str(),
        d.hint.map(|hint| hint.as_str()).unwrap_or("-"),
    );
}

fn print_step(label: &str, d: &Directive) {
    println!(
        "  {:<28} status={:<19} toggle_on={:<5} hint={}",
        label,
        d.status.as_str(),
        d.toggle_on,
        d.hint.map(|hint| hint.as_str()).unwrap_or("-"),
    );
}

fn init_logging() {
    let debug_enabled = env::var("DESKSIDE_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
