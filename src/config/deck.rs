// src/config/deck.rs

//! Deck files: TOML batches of command definitions.
//!
//! ```toml
//! [command.build]
//! executable = "cargo"
//! position = 1
//!
//! [[command.build.argument]]
//! name = "build"
//! is_positional = true
//!
//! [command.serve]
//! executable = "python3"
//! depends_on = ["build"]
//!
//! [[command.serve.argument]]
//! name = "--port"
//! value = "{{port}}"
//! ```
//!
//! A deck only describes definitions. Importing one never touches the
//! run-produced fields of commands that already exist in the store.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::model::{Argument, ArgumentKind, CommandDefinition};

/// Deck file as deserialized, before semantic validation.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawDeckFile {
    /// All definitions from `[command.<id>]`, keyed by id.
    #[serde(default)]
    pub command: BTreeMap<String, RawDeckCommand>,
}

/// `[command.<id>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDeckCommand {
    /// Display name; defaults to the id when omitted.
    #[serde(default)]
    pub name: Option<String>,

    pub executable: String,

    #[serde(default)]
    pub working_directory: Option<String>,

    #[serde(default)]
    pub depends_on: Vec<String>,

    #[serde(default)]
    pub position: Option<u32>,

    /// Ordered `[[command.<id>.argument]]` entries.
    #[serde(default)]
    pub argument: Vec<RawDeckArgument>,
}

/// One `[[command.<id>.argument]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDeckArgument {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub value: String,

    /// `"static"` (default) or `"variable"`.
    #[serde(default, rename = "type")]
    pub kind: ArgumentKind,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub is_positional: bool,

    #[serde(default)]
    pub joiner: Option<String>,

    #[serde(default)]
    pub source_command_id: Option<String>,

    #[serde(default)]
    pub regex: Option<String>,
}

fn default_enabled() -> bool {
    true
}

/// A deck that passed validation. Construct via `TryFrom<RawDeckFile>`.
#[derive(Debug, Clone)]
pub struct DeckFile {
    pub command: BTreeMap<String, RawDeckCommand>,
}

impl DeckFile {
    /// Used by the validation layer once all checks have passed.
    pub(crate) fn new_unchecked(command: BTreeMap<String, RawDeckCommand>) -> Self {
        DeckFile { command }
    }
}

impl RawDeckCommand {
    /// Build the definition this deck entry describes. Run-produced fields
    /// start pristine; the import path preserves them separately for
    /// commands that already exist.
    pub fn into_definition(self, id: &str) -> CommandDefinition {
        CommandDefinition {
            id: id.to_string(),
            name: self.name.unwrap_or_else(|| id.to_string()),
            executable: self.executable,
            arguments: self.argument.into_iter().map(RawDeckArgument::into_argument).collect(),
            depends_on: self.depends_on,
            working_directory: self.working_directory,
            position: self.position,
            ..CommandDefinition::default()
        }
    }
}

impl RawDeckArgument {
    fn into_argument(self) -> Argument {
        Argument {
            name: self.name,
            value: self.value,
            kind: self.kind,
            enabled: self.enabled,
            is_positional: self.is_positional,
            joiner: self.joiner,
            source_command_id: self.source_command_id,
            regex: self.regex,
        }
    }
}
