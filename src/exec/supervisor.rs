// src/exec/supervisor.rs

//! Process supervision.
//!
//! The supervisor owns the registry of live runs: at most one process group
//! per command id. The existence check and the registration happen under one
//! lock, together with the spawn itself, so two concurrent run requests for
//! the same command can never both get a process.
//!
//! After a successful spawn the supervisor wires up the output relay and a
//! reaper task. The reaper waits for the process, waits for the relay to
//! drain, classifies the exit, persists the final state and only then drops
//! the registry entry. Stop requests signal the whole process group and let
//! the reaper observe the death; the registry entry is never removed early.

use std::collections::HashMap;
use std::io;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::{CmdchainError, Result};
use crate::events::{Event, EventHub};
use crate::exec::{process_group, relay};
use crate::model::CommandDefinition;
use crate::resolve::ResolvedInvocation;
use crate::status;
use crate::store::StateStore;
use crate::types::CommandStatus;

/// Handle for one live process group, held in the registry between spawn
/// and reap.
#[derive(Debug, Clone)]
struct RunningProcess {
    /// Pid of the group leader, which is also the group id.
    pid: u32,
    /// Set by `stop`; read by the reaper to classify the exit.
    stop_requested: Arc<AtomicBool>,
}

type Registry = Arc<Mutex<HashMap<String, RunningProcess>>>;

#[derive(Debug)]
pub struct ProcessSupervisor {
    store: Arc<dyn StateStore>,
    events: EventHub,
    relay_buffer: usize,
    registry: Registry,
}

impl ProcessSupervisor {
    pub fn new(store: Arc<dyn StateStore>, events: EventHub, relay_buffer: usize) -> Self {
        ProcessSupervisor {
            store,
            events,
            relay_buffer,
            registry: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Whether a live process group currently exists for this command.
    pub fn is_running(&self, command_id: &str) -> bool {
        self.lock_registry().contains_key(command_id)
    }

    /// Ids of all commands with a live process group right now.
    pub fn running_ids(&self) -> Vec<String> {
        self.lock_registry().keys().cloned().collect()
    }

    /// Run `action` only if no live process exists for `command_id`. The
    /// registry lock is held across the action, so a concurrent launch
    /// cannot slip in between the check and the action.
    pub fn unless_running<R>(&self, command_id: &str, action: impl FnOnce() -> R) -> Option<R> {
        let registry = self.lock_registry();
        if registry.contains_key(command_id) {
            None
        } else {
            Some(action())
        }
    }

    /// Spawn the resolved invocation as a fresh process group and register
    /// it. `def` must already carry the regenerated command line and seeded
    /// output; on success it is persisted as `running` and returned.
    ///
    /// A spawn failure is persisted as a pre-flight error (single message in
    /// errorOutput) before the error is returned.
    pub fn launch(
        &self,
        mut def: CommandDefinition,
        invocation: &ResolvedInvocation,
    ) -> Result<CommandDefinition> {
        let command_id = def.id.clone();
        let stop_requested = Arc::new(AtomicBool::new(false));

        let mut child = {
            let mut registry = self.lock_registry();
            if registry.contains_key(&command_id) {
                return Err(CmdchainError::AlreadyRunning(command_id));
            }
            let child = match spawn_shell(invocation) {
                Ok(child) => child,
                Err(err) => {
                    drop(registry);
                    return Err(self.fail_spawn(def, invocation, err));
                }
            };
            let Some(pid) = child.id() else {
                // The child exited before we could even look at it.
                drop(registry);
                return Err(self.fail_spawn(
                    def,
                    invocation,
                    io::Error::other("child exited during spawn"),
                ));
            };
            registry.insert(
                command_id.clone(),
                RunningProcess {
                    pid,
                    stop_requested: stop_requested.clone(),
                },
            );
            child
        };

        def.status = CommandStatus::Running;
        if let Err(err) = self.store.put(&def) {
            error!(command = %command_id, error = %err, "failed to persist running status");
        }
        self.events.emit(Event::StatusChanged {
            command_id: command_id.clone(),
            status: CommandStatus::Running,
            return_code: None,
        });
        info!(command = %command_id, cmd = %invocation.command_line, "command started");

        let relay_done = relay::spawn_relay(
            command_id.clone(),
            child.stdout.take(),
            child.stderr.take(),
            self.store.clone(),
            self.events.clone(),
            self.relay_buffer,
        );

        tokio::spawn(supervise(
            command_id,
            child,
            stop_requested,
            relay_done,
            self.store.clone(),
            self.events.clone(),
            self.registry.clone(),
        ));

        Ok(def)
    }

    /// Request a graceful stop: signal the whole process group and return.
    /// The reaper observes the death and records the `stopped` status; this
    /// never waits for the exit. A group that is already gone counts as
    /// stopped successfully.
    pub fn stop(&self, command_id: &str) -> Result<()> {
        let handle = self.lock_registry().get(command_id).cloned();
        let Some(handle) = handle else {
            return Err(CmdchainError::NotRunning(command_id.to_string()));
        };

        // Mark before signalling, so the reaper classifies the exit as
        // stopped even if the group dies before this function returns.
        handle.stop_requested.store(true, Ordering::SeqCst);
        process_group::signal_group(handle.pid, process_group::STOP_SIGNAL)?;
        info!(command = %command_id, pid = handle.pid, "stop signal sent to process group");
        Ok(())
    }

    fn lock_registry(&self) -> MutexGuard<'_, HashMap<String, RunningProcess>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fail_spawn(
        &self,
        mut def: CommandDefinition,
        invocation: &ResolvedInvocation,
        err: io::Error,
    ) -> CmdchainError {
        let failure = CmdchainError::SpawnFailure(invocation.command_line.clone(), err.to_string());
        warn!(command = %def.id, error = %err, "spawn failed");
        def.record_failure(&failure.to_string());
        if let Err(store_err) = self.store.put(&def) {
            error!(command = %def.id, error = %store_err, "failed to persist spawn failure");
        }
        self.events.emit(Event::StatusChanged {
            command_id: def.id.clone(),
            status: CommandStatus::Error,
            return_code: None,
        });
        failure
    }
}

/// Reaper for one run: wait for the process, drain the relay, persist the
/// final status, then free the registry slot.
async fn supervise(
    command_id: String,
    mut child: Child,
    stop_requested: Arc<AtomicBool>,
    relay_done: JoinHandle<()>,
    store: Arc<dyn StateStore>,
    events: EventHub,
    registry: Registry,
) {
    let wait_result = child.wait().await;

    // Every captured line must be persisted before the final status lands.
    if relay_done.await.is_err() {
        warn!(command = %command_id, "output relay aborted");
    }

    let code = match wait_result {
        Ok(exit) => exit_code(exit),
        Err(err) => {
            error!(command = %command_id, error = %err, "waiting for child failed");
            -1
        }
    };
    let final_status = status::classify_exit(stop_requested.load(Ordering::SeqCst), code);

    match store.get(&command_id) {
        Ok(Some(mut def)) => {
            def.status = final_status;
            def.return_code = Some(code);
            if let Err(err) = store.put(&def) {
                error!(command = %command_id, error = %err, "failed to persist final status");
            }
        }
        Ok(None) => warn!(command = %command_id, "definition vanished before finalize"),
        Err(err) => error!(command = %command_id, error = %err, "failed to load definition for finalize"),
    }
    events.emit(Event::StatusChanged {
        command_id: command_id.clone(),
        status: final_status,
        return_code: Some(code),
    });

    registry
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&command_id);
    info!(command = %command_id, code, status = %final_status, "command finished");
}

/// Run the generated line through the platform shell, as the leader of a new
/// process group, with both output streams piped.
fn spawn_shell(invocation: &ResolvedInvocation) -> io::Result<Child> {
    let mut cmd = if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(&invocation.command_line);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&invocation.command_line);
        cmd
    };
    if let Some(dir) = &invocation.working_dir {
        cmd.current_dir(dir);
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    process_group::lead_new_group(&mut cmd);
    cmd.spawn()
}

#[cfg(unix)]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    // Signal deaths record the negated signal number (SIGTERM becomes -15).
    status
        .code()
        .or_else(|| status.signal().map(|s| -s))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
