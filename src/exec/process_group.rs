// src/exec/process_group.rs

//! Process group plumbing.
//!
//! Commands run through a shell, so the interesting children are usually
//! grandchildren. Each spawned command becomes the leader of a fresh process
//! group, and stop requests signal the whole group rather than just the
//! shell. On non-unix targets these are no-ops and stopping falls back to
//! whatever the runtime can do with the direct child.

use std::io;

use tokio::process::Command;

/// Default signal sent on stop: terminate, politely.
#[cfg(unix)]
pub const STOP_SIGNAL: i32 = libc::SIGTERM;

#[cfg(not(unix))]
pub const STOP_SIGNAL: i32 = 15;

/// Arrange for the child to start as the leader of a new process group
/// (its pid becomes the group id).
#[cfg(unix)]
pub fn lead_new_group(cmd: &mut Command) {
    cmd.process_group(0);
}

#[cfg(not(unix))]
pub fn lead_new_group(_cmd: &mut Command) {}

/// Send `signal` to the whole process group led by `pid`.
///
/// A group that no longer exists is treated as success: the processes are
/// gone, which is exactly what the caller wanted.
#[cfg(unix)]
pub fn signal_group(pid: u32, signal: i32) -> io::Result<()> {
    let result = unsafe { libc::killpg(pid as libc::pid_t, signal) };
    if result == -1 {
        let err = io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::ESRCH) {
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn signal_group(_pid: u32, _signal: i32) -> io::Result<()> {
    Ok(())
}
