// src/service/run.rs

//! The run and stop operations.
//!
//! Running is a pipeline: pre-flight resolution against the store, then the
//! supervisor takes over (atomic spawn and registration, output relay,
//! reaper). Nothing is persisted by a run request that loses the race for
//! the registry slot, so the winner's captured output is never clobbered.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, warn};

use crate::errors::{CmdchainError, Result};
use crate::events::Event;
use crate::model::CommandDefinition;
use crate::resolve::{self, DependencyLookup, HistorySink, ResolveContext};
use crate::service::CommandService;
use crate::store::StateStore;
use crate::types::CommandStatus;

/// Lookup that reads dependency definitions straight from the store.
struct StoreLookup<'a> {
    store: &'a Arc<dyn StateStore>,
}

impl DependencyLookup for StoreLookup<'_> {
    fn command(&self, id: &str) -> Option<CommandDefinition> {
        match self.store.get(id) {
            Ok(found) => found,
            Err(err) => {
                warn!(command = %id, error = %err, "store read failed during resolution");
                None
            }
        }
    }
}

/// Sink feeding the argument ledger. Ledger failures are logged, never
/// fatal: losing a history entry must not abort a run.
struct LedgerSink<'a> {
    store: &'a Arc<dyn StateStore>,
}

impl HistorySink for LedgerSink<'_> {
    fn record(&self, command_id: &str, argument: &str, value: &str) {
        if let Err(err) = self.store.record(command_id, argument, value) {
            warn!(command = %command_id, argument, error = %err, "failed to record argument history");
        }
    }
}

impl CommandService {
    /// Resolve and start a command.
    ///
    /// On success the returned definition is the freshly persisted `running`
    /// snapshot, output seeded with the `$ <command>` line; completion
    /// arrives later through the event hub. Every pre-flight failure
    /// (resolution, missing working directory, spawn) is persisted as an
    /// `error` status with the failure message as the sole errorOutput
    /// entry, then returned to the caller.
    pub fn run_command(&self, id: &str) -> Result<CommandDefinition> {
        let def = self.require(id)?;
        if self.supervisor.is_running(id) {
            return Err(CmdchainError::AlreadyRunning(id.to_string()));
        }

        let variables = self.store.variables()?;
        let lookup = StoreLookup { store: &self.store };
        let history = LedgerSink { store: &self.store };
        let ctx = ResolveContext {
            lookup: &lookup,
            variables: &variables,
            history: &history,
        };

        let invocation = match resolve::resolve(&def, &ctx) {
            Ok(invocation) => invocation,
            Err(err) => return Err(self.preflight_failure(def, err.into())),
        };

        let mut def = def;
        def.reset_for_run(&invocation.command_line);

        if let Some(dir) = invocation.working_dir.as_deref() {
            if !Path::new(dir).is_dir() {
                let err = CmdchainError::SpawnFailure(
                    invocation.command_line.clone(),
                    format!("working directory not found: {dir}"),
                );
                return Err(self.preflight_failure(def, err));
            }
            self.store.record_working_dir(dir)?;
        }

        self.supervisor.launch(def, &invocation)
    }

    /// Ask the live process group to stop, without waiting for it to die.
    /// `NotRunning` when there is no live process. The final `stopped`
    /// status lands asynchronously once the reaper sees the group exit.
    pub fn stop_command(&self, id: &str) -> Result<()> {
        self.supervisor.stop(id)
    }

    /// Persist and publish a failure that happened before any process
    /// existed. The definition passed in decides what else lands in the
    /// store: resolution failures keep the previous run's output, later
    /// failures already carry the reseeded output and generated command.
    fn preflight_failure(&self, mut def: CommandDefinition, err: CmdchainError) -> CmdchainError {
        let message = err.to_string();
        warn!(command = %def.id, error = %message, "run aborted before spawn");
        def.record_failure(&message);
        if let Err(store_err) = self.store.put(&def) {
            error!(command = %def.id, error = %store_err, "failed to persist pre-flight failure");
        }
        self.events.emit(Event::StatusChanged {
            command_id: def.id.clone(),
            status: CommandStatus::Error,
            return_code: None,
        });
        err
    }
}
