use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a command definition.
///
/// - `Defined`: never run (or explicitly reset).
/// - `Running`: a supervised process group is currently alive for it.
/// - `Success`: last run exited with code 0 and no stop was requested.
/// - `Error`: last run failed, either before spawning (resolution or spawn
///   failure) or with a non-zero exit.
/// - `Stopped`: last run ended after a stop request, whatever the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    Defined,
    Running,
    Success,
    Error,
    Stopped,
}

impl Default for CommandStatus {
    fn default() -> Self {
        CommandStatus::Defined
    }
}

impl CommandStatus {
    /// Whether this status marks a finished run.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CommandStatus::Success | CommandStatus::Error | CommandStatus::Stopped
        )
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommandStatus::Defined => "defined",
            CommandStatus::Running => "running",
            CommandStatus::Success => "success",
            CommandStatus::Error => "error",
            CommandStatus::Stopped => "stopped",
        };
        write!(f, "{s}")
    }
}

impl FromStr for CommandStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "defined" => Ok(CommandStatus::Defined),
            "running" => Ok(CommandStatus::Running),
            "success" => Ok(CommandStatus::Success),
            "error" => Ok(CommandStatus::Error),
            "stopped" => Ok(CommandStatus::Stopped),
            other => Err(format!("invalid status: {other}")),
        }
    }
}

/// Which standard stream a captured line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => write!(f, "stdout"),
            StreamKind::Stderr => write!(f, "stderr"),
        }
    }
}

/// Mode for the state store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    /// Persist state in a JSON file (`.cmdchain/state.json` by default).
    File,
    /// Keep state in memory only (lost when the process exits).
    Memory,
}

impl Default for StoreMode {
    fn default() -> Self {
        StoreMode::File
    }
}
