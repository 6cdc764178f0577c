// src/store/mod.rs

//! State persistence behind narrow trait seams.
//!
//! The service and the execution pipeline only ever talk to the traits here,
//! so tests and the in-memory backend swap in without touching them. Two
//! backends exist: [`MemoryStore`] (state dies with the process) and
//! [`FileStore`] (one JSON document on disk, rewritten atomically on every
//! mutation).

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::errors::Result;
use crate::model::CommandDefinition;

/// How many entries history queries return at most.
pub const HISTORY_LIMIT: usize = 10;

/// Storage for command definitions, keyed by id.
pub trait CommandStore: Send + Sync + Debug {
    fn get(&self, id: &str) -> Result<Option<CommandDefinition>>;
    fn list(&self) -> Result<Vec<CommandDefinition>>;
    /// Insert or replace the definition under its id.
    fn put(&self, def: &CommandDefinition) -> Result<()>;
    /// Deleting an id that does not exist is not an error.
    fn delete(&self, id: &str) -> Result<()>;
}

/// Ledger of values that have been used for static arguments.
pub trait ArgumentHistory: Send + Sync + Debug {
    /// Remember `value` for `(command, argument)`. A triple that was already
    /// recorded is left where it was (recording is idempotent).
    fn record(&self, command_id: &str, argument: &str, value: &str) -> Result<()>;

    /// Up to `limit` distinct values for `(command, argument)`, most recently
    /// recorded first. Re-use of an already recorded value does not move it
    /// forward, since recording it again is a no-op.
    fn query(&self, command_id: &str, argument: &str, limit: usize) -> Result<Vec<String>>;

    /// Drop every entry recorded for a command. Called when it is deleted.
    fn forget_command(&self, command_id: &str) -> Result<()>;
}

/// Global `{{name}}` substitution variables.
pub trait VariableStore: Send + Sync + Debug {
    fn variables(&self) -> Result<BTreeMap<String, String>>;
    fn set_variable(&self, name: &str, value: &str) -> Result<()>;
    /// Removing a variable that does not exist is not an error.
    fn delete_variable(&self, name: &str) -> Result<()>;
}

/// Ledger of working directories commands have been run in.
pub trait WorkingDirHistory: Send + Sync + Debug {
    /// Idempotent, like [`ArgumentHistory::record`].
    fn record_working_dir(&self, path: &str) -> Result<()>;
    fn working_dirs(&self, limit: usize) -> Result<Vec<String>>;
}

/// The full persistence surface the service is built on.
pub trait StateStore: CommandStore + ArgumentHistory + VariableStore + WorkingDirHistory {}

impl<T> StateStore for T where T: CommandStore + ArgumentHistory + VariableStore + WorkingDirHistory {}
