// src/service/mod.rs

//! The service surface: every operation a frontend can perform.
//!
//! This layer ties the store, the event hub and the process supervisor
//! together and owns the business rules that sit above plain persistence:
//! - CRUD with id generation and the delete-while-running guard (`crud.rs`),
//! - the run/stop lifecycle with pre-flight resolution (`run.rs`),
//! - history and variable queries, and the regex probe.
//!
//! Reads merge liveness in: a command with a live process group always
//! reports `running`, whatever status the store last persisted.

pub mod crud;
pub mod run;

use std::sync::Arc;

use crate::config::model::ExecSection;
use crate::errors::{CmdchainError, Result};
use crate::events::EventHub;
use crate::exec::ProcessSupervisor;
use crate::model::CommandDefinition;
use crate::status;
use crate::store::StateStore;

pub struct CommandService {
    store: Arc<dyn StateStore>,
    events: EventHub,
    supervisor: Arc<ProcessSupervisor>,
}

impl CommandService {
    pub fn new(store: Arc<dyn StateStore>, events: EventHub, exec: &ExecSection) -> Self {
        let supervisor = Arc::new(ProcessSupervisor::new(
            store.clone(),
            events.clone(),
            exec.relay_buffer,
        ));
        CommandService {
            store,
            events,
            supervisor,
        }
    }

    /// The hub this service publishes to. Subscribe before mutating to
    /// observe everything a call causes.
    pub fn events(&self) -> &EventHub {
        &self.events
    }

    /// Whether a live process group exists for this command right now.
    pub fn is_running(&self, command_id: &str) -> bool {
        self.supervisor.is_running(command_id)
    }

    fn merged(&self, mut def: CommandDefinition) -> CommandDefinition {
        def.status = status::effective(def.status, self.supervisor.is_running(&def.id));
        def
    }

    fn require(&self, id: &str) -> Result<CommandDefinition> {
        self.store
            .get(id)?
            .ok_or_else(|| CmdchainError::CommandNotFound(id.to_string()))
    }
}
