// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::resolve::ResolveError;

#[derive(Error, Debug)]
pub enum CmdchainError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Command already exists: {0}")]
    CommandExists(String),

    #[error("Command '{0}' is already running")]
    AlreadyRunning(String),

    #[error("Command '{0}' is not running")]
    NotRunning(String),

    #[error("Command '{0}' cannot be deleted while it is running")]
    DeleteWhileRunning(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Failed to spawn '{0}': {1}")]
    SpawnFailure(String, String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CmdchainError>;
