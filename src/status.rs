// src/status.rs

//! Status transition rules for command lifecycles.
//!
//! The persisted status is only half the truth: whether a live process group
//! exists for a command right now is owned by the process supervisor's
//! registry, and liveness always wins when the two disagree (a stale
//! `running` left behind by a crash never blocks anything). The helpers here
//! keep those rules in one place.

use crate::types::CommandStatus;

/// What a command's status should read as, given its persisted value and
/// whether the supervisor currently has a live process for it.
pub fn effective(persisted: CommandStatus, live: bool) -> CommandStatus {
    if live { CommandStatus::Running } else { persisted }
}

/// Final status of a finished process.
///
/// A requested stop always wins, whatever the exit code: the process may have
/// caught the signal and exited 0, or died from it. Otherwise exit code 0 is
/// a success and anything else an error.
pub fn classify_exit(stop_requested: bool, code: i32) -> CommandStatus {
    if stop_requested {
        CommandStatus::Stopped
    } else if code == 0 {
        CommandStatus::Success
    } else {
        CommandStatus::Error
    }
}

/// Whether `from -> to` is a transition the lifecycle can actually produce.
///
/// - `running` is entered from any non-running state when a run starts.
/// - `success` and `stopped` are only ever produced by reaping a live run.
/// - `error` can come from a reap or from a pre-flight failure, so it is
///   reachable from anywhere.
/// - `defined` is the initial state only; nothing transitions back into it.
pub fn is_legal_transition(from: CommandStatus, to: CommandStatus) -> bool {
    match to {
        CommandStatus::Running => from != CommandStatus::Running,
        CommandStatus::Success | CommandStatus::Stopped => from == CommandStatus::Running,
        CommandStatus::Error => true,
        CommandStatus::Defined => false,
    }
}
