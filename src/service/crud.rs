// src/service/crud.rs

//! Command CRUD, history queries, variables and the regex probe.

use std::collections::BTreeMap;

use tracing::info;
use uuid::Uuid;

use crate::errors::{CmdchainError, Result};
use crate::events::Event;
use crate::model::CommandDefinition;
use crate::resolve::{self, ResolveError};
use crate::service::CommandService;
use crate::store::HISTORY_LIMIT;

impl CommandService {
    /// Store a new command. An empty id gets a generated `cmd-<uuid>` one;
    /// a submitted id that already exists is refused. Whatever run-produced
    /// fields the caller sent along are wiped: new commands start pristine.
    pub fn create_command(&self, mut def: CommandDefinition) -> Result<CommandDefinition> {
        if def.id.is_empty() {
            def.id = format!("cmd-{}", Uuid::new_v4());
        } else if self.store.get(&def.id)?.is_some() {
            return Err(CmdchainError::CommandExists(def.id));
        }
        def.reset_runtime();
        self.store.put(&def)?;
        self.events.emit(Event::CommandCreated {
            command: def.clone(),
        });
        info!(command = %def.id, name = %def.name, "command created");
        Ok(def)
    }

    /// All commands with live status merged in, ordered by position
    /// (commands without one sort last), then name, then id.
    pub fn list_commands(&self) -> Result<Vec<CommandDefinition>> {
        let mut defs: Vec<CommandDefinition> = self
            .store
            .list()?
            .into_iter()
            .map(|def| self.merged(def))
            .collect();
        defs.sort_by(|a, b| {
            let ka = (a.position.unwrap_or(u32::MAX), a.name.as_str(), a.id.as_str());
            let kb = (b.position.unwrap_or(u32::MAX), b.name.as_str(), b.id.as_str());
            ka.cmp(&kb)
        });
        Ok(defs)
    }

    pub fn get_command(&self, id: &str) -> Result<CommandDefinition> {
        Ok(self.merged(self.require(id)?))
    }

    /// Replace the definition fields of an existing command. Run-produced
    /// fields (status, captured output, generated command, return code)
    /// survive the update.
    pub fn update_command(&self, incoming: CommandDefinition) -> Result<CommandDefinition> {
        let mut stored = self.require(&incoming.id)?;
        stored.apply_update(incoming);
        self.store.put(&stored)?;
        self.events.emit(Event::CommandUpdated {
            command: stored.clone(),
        });
        info!(command = %stored.id, "command updated");
        Ok(stored)
    }

    /// Delete a command together with its argument history. Refused while a
    /// live process exists; the check and the removal run under the
    /// supervisor's registry lock so a concurrent launch cannot interleave.
    pub fn delete_command(&self, id: &str) -> Result<()> {
        self.require(id)?;
        let removed = self.supervisor.unless_running(id, || {
            self.store.delete(id)?;
            self.store.forget_command(id)
        });
        match removed {
            None => Err(CmdchainError::DeleteWhileRunning(id.to_string())),
            Some(result) => {
                result?;
                self.events.emit(Event::CommandDeleted {
                    command_id: id.to_string(),
                });
                info!(command = %id, "command deleted");
                Ok(())
            }
        }
    }

    /// Recent distinct values used for one argument of one command,
    /// most recent first, capped at [`HISTORY_LIMIT`].
    pub fn argument_history(&self, command_id: &str, argument: &str) -> Result<Vec<String>> {
        self.store.query(command_id, argument, HISTORY_LIMIT)
    }

    /// Recent distinct working directories commands were run in.
    pub fn working_dir_history(&self) -> Result<Vec<String>> {
        self.store.working_dirs(HISTORY_LIMIT)
    }

    pub fn variables(&self) -> Result<BTreeMap<String, String>> {
        self.store.variables()
    }

    pub fn set_variable(&self, name: &str, value: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(CmdchainError::ConfigError(
                "variable name must not be empty".to_string(),
            ));
        }
        self.store.set_variable(name, value)
    }

    pub fn delete_variable(&self, name: &str) -> Result<()> {
        self.store.delete_variable(name)
    }

    /// Dry-run a pattern against sample output with the same extraction rule
    /// variable arguments use. `Ok(None)` means the pattern matched nothing.
    pub fn test_regex(&self, pattern: &str, sample: &str) -> Result<Option<String>> {
        resolve::extract(pattern, sample)
            .map_err(|err| ResolveError::InvalidRegex(format!("Invalid regex: {err}")).into())
    }
}
