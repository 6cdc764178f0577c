// src/store/memory.rs

//! In-memory state store. Everything lives behind one mutex and dies with
//! the process. Used by tests and by `store.mode = "memory"`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::Result;
use crate::model::CommandDefinition;
use crate::store::{ArgumentHistory, CommandStore, VariableStore, WorkingDirHistory};

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    commands: HashMap<String, CommandDefinition>,
    history: Vec<HistoryEntry>,
    variables: BTreeMap<String, String>,
    working_dirs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HistoryEntry {
    command_id: String,
    argument: String,
    value: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CommandStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<CommandDefinition>> {
        Ok(self.lock().commands.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<CommandDefinition>> {
        Ok(self.lock().commands.values().cloned().collect())
    }

    fn put(&self, def: &CommandDefinition) -> Result<()> {
        self.lock().commands.insert(def.id.clone(), def.clone());
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.lock().commands.remove(id);
        Ok(())
    }
}

impl ArgumentHistory for MemoryStore {
    fn record(&self, command_id: &str, argument: &str, value: &str) -> Result<()> {
        let entry = HistoryEntry {
            command_id: command_id.to_string(),
            argument: argument.to_string(),
            value: value.to_string(),
        };
        let mut state = self.lock();
        if !state.history.contains(&entry) {
            state.history.push(entry);
        }
        Ok(())
    }

    fn query(&self, command_id: &str, argument: &str, limit: usize) -> Result<Vec<String>> {
        let state = self.lock();
        Ok(state
            .history
            .iter()
            .rev()
            .filter(|e| e.command_id == command_id && e.argument == argument)
            .map(|e| e.value.clone())
            .take(limit)
            .collect())
    }

    fn forget_command(&self, command_id: &str) -> Result<()> {
        self.lock().history.retain(|e| e.command_id != command_id);
        Ok(())
    }
}

impl VariableStore for MemoryStore {
    fn variables(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.lock().variables.clone())
    }

    fn set_variable(&self, name: &str, value: &str) -> Result<()> {
        self.lock()
            .variables
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete_variable(&self, name: &str) -> Result<()> {
        self.lock().variables.remove(name);
        Ok(())
    }
}

impl WorkingDirHistory for MemoryStore {
    fn record_working_dir(&self, path: &str) -> Result<()> {
        let mut state = self.lock();
        if !state.working_dirs.iter().any(|p| p == path) {
            state.working_dirs.push(path.to_string());
        }
        Ok(())
    }

    fn working_dirs(&self, limit: usize) -> Result<Vec<String>> {
        Ok(self
            .lock()
            .working_dirs
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}
