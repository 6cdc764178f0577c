// tests/status_rules.rs

use cmdchain::status::{classify_exit, effective, is_legal_transition};
use cmdchain::types::CommandStatus::{self, Defined, Error, Running, Stopped, Success};

const ALL: [CommandStatus; 5] = [Defined, Running, Success, Error, Stopped];

#[test]
fn liveness_always_wins() {
    for persisted in ALL {
        assert_eq!(effective(persisted, true), Running);
        assert_eq!(effective(persisted, false), persisted);
    }
}

#[test]
fn exit_classification() {
    assert_eq!(classify_exit(false, 0), Success);
    assert_eq!(classify_exit(false, 3), Error);
    assert_eq!(classify_exit(false, -15), Error);
    // A requested stop wins over any exit code, even a clean one.
    assert_eq!(classify_exit(true, 0), Stopped);
    assert_eq!(classify_exit(true, -15), Stopped);
}

#[test]
fn running_is_reachable_from_every_rest_state() {
    for from in [Defined, Success, Error, Stopped] {
        assert!(is_legal_transition(from, Running), "{from} -> running");
    }
    assert!(!is_legal_transition(Running, Running));
}

#[test]
fn only_a_live_run_can_finish_cleanly_or_stopped() {
    for from in ALL {
        assert_eq!(is_legal_transition(from, Success), from == Running);
        assert_eq!(is_legal_transition(from, Stopped), from == Running);
        // Pre-flight failures can hit a command in any state.
        assert!(is_legal_transition(from, Error));
        // Nothing ever goes back to pristine.
        assert!(!is_legal_transition(from, Defined));
    }
}

#[test]
fn terminal_states_are_exactly_the_finished_ones() {
    assert!(!Defined.is_terminal());
    assert!(!Running.is_terminal());
    assert!(Success.is_terminal());
    assert!(Error.is_terminal());
    assert!(Stopped.is_terminal());
}
