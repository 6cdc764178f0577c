// src/model.rs

//! Command definitions and their arguments.
//!
//! A [`CommandDefinition`] is a reusable shell command template: an executable
//! plus an ordered list of arguments. Arguments are either `static` (a fixed
//! value) or `variable` (extracted at run time from another command's captured
//! output via a regex). The definition also carries the run-produced fields
//! (status, generated command line, captured output, return code) so a single
//! record tells the whole story of the last run.
//!
//! Serialization uses camelCase field names; this is the exact JSON shape the
//! file store persists and the event hub broadcasts.

use serde::{Deserialize, Serialize};

use crate::types::{CommandStatus, StreamKind};

/// Kind of an [`Argument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentKind {
    /// Fixed value, used as-is (after variable substitution).
    Static,
    /// Value extracted from a source command's captured output via regex.
    Variable,
}

impl Default for ArgumentKind {
    fn default() -> Self {
        ArgumentKind::Static
    }
}

/// One argument of a command template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    /// Flag token (for example `--port`). May be empty for positional values.
    #[serde(default)]
    pub name: String,

    /// Static value. Ignored for `variable` arguments.
    #[serde(default)]
    pub value: String,

    #[serde(default, rename = "type")]
    pub kind: ArgumentKind,

    /// Disabled arguments are skipped entirely during resolution.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Positional arguments emit only their (quoted) value, never the name.
    #[serde(default)]
    pub is_positional: bool,

    /// Glue between name and value producing a single token (for example `=`
    /// for `--port=8080`). Without a joiner, name and value are two tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joiner: Option<String>,

    /// Id of the command whose captured output feeds this argument.
    /// Required for `variable` arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_command_id: Option<String>,

    /// Extraction pattern run against the source command's output.
    /// Required for `variable` arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Default for Argument {
    fn default() -> Self {
        Argument {
            name: String::new(),
            value: String::new(),
            kind: ArgumentKind::Static,
            enabled: true,
            is_positional: false,
            joiner: None,
            source_command_id: None,
            regex: None,
        }
    }
}

/// A stored, reusable command template together with the state of its last run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDefinition {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Program to run. The resolved argument tokens are appended to this and
    /// the whole line is handed to the shell.
    #[serde(default)]
    pub executable: String,

    #[serde(default)]
    pub arguments: Vec<Argument>,

    /// Ids of commands that must have run successfully before this one may
    /// start, in addition to the sources of its variable arguments.
    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Directory the process is spawned in. Variables are substituted first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,

    /// Sort key for listings. Commands without a position sort last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    #[serde(default)]
    pub status: CommandStatus,

    /// Exact shell line of the last run attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_command: Option<String>,

    /// Captured stdout of the last run, one entry per line, seeded with the
    /// `$ <command>` echo line.
    #[serde(default)]
    pub output: Vec<String>,

    /// Captured stderr of the last run, or the single failure message when
    /// the run never got as far as spawning.
    #[serde(default)]
    pub error_output: Vec<String>,

    /// Exit code of the last finished run. Signal deaths on unix record the
    /// negated signal number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_code: Option<i32>,
}

impl CommandDefinition {
    /// Wipe every run-produced field back to the pristine `defined` state.
    pub fn reset_runtime(&mut self) {
        self.status = CommandStatus::Defined;
        self.generated_command = None;
        self.output.clear();
        self.error_output.clear();
        self.return_code = None;
    }

    /// Prepare for a fresh run: record the generated shell line and seed the
    /// captured output with the `$ <command>` echo of it.
    pub fn reset_for_run(&mut self, generated: &str) {
        self.generated_command = Some(generated.to_string());
        self.output = vec![format!("$ {generated}")];
        self.error_output.clear();
        self.return_code = None;
    }

    /// Mark a run attempt that failed before the process ever started.
    /// The message becomes the sole errorOutput entry.
    pub fn record_failure(&mut self, message: &str) {
        self.status = CommandStatus::Error;
        self.error_output = vec![message.to_string()];
    }

    /// Append one captured line to the matching stream buffer.
    pub fn append_line(&mut self, stream: StreamKind, line: String) {
        match stream {
            StreamKind::Stdout => self.output.push(line),
            StreamKind::Stderr => self.error_output.push(line),
        }
    }

    /// Take the definition fields from `incoming`, keeping the run-produced
    /// fields (status, output, generated command, return code) untouched.
    pub fn apply_update(&mut self, incoming: CommandDefinition) {
        self.name = incoming.name;
        self.executable = incoming.executable;
        self.arguments = incoming.arguments;
        self.depends_on = incoming.depends_on;
        self.working_directory = incoming.working_directory;
        self.position = incoming.position;
    }
}
