// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::StoreMode;

/// Top-level settings as read from `cmdchain.toml`.
///
/// ```toml
/// [store]
/// mode = "file"
/// path = ".cmdchain/state.json"
///
/// [events]
/// capacity = 256
///
/// [exec]
/// relay_buffer = 64
/// ```
///
/// All sections are optional and have usable defaults; a missing settings
/// file means "all defaults".
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub events: EventsSection,

    #[serde(default)]
    pub exec: ExecSection,
}

/// `[store]` section: which backend keeps the state.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    /// `"file"` (default) or `"memory"`.
    #[serde(default)]
    pub mode: StoreMode,

    /// Where the file backend keeps its JSON document.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".cmdchain/state.json")
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            mode: StoreMode::default(),
            path: default_store_path(),
        }
    }
}

/// `[events]` section: broadcast channel sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct EventsSection {
    /// How many events a slow subscriber may fall behind before losing the
    /// oldest ones.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    256
}

impl Default for EventsSection {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

/// `[exec]` section: execution pipeline tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecSection {
    /// Bound of the channel between stream readers and the relay sink.
    /// A chatty process fills it and gets backpressured, never dropped.
    #[serde(default = "default_relay_buffer")]
    pub relay_buffer: usize,
}

fn default_relay_buffer() -> usize {
    64
}

impl Default for ExecSection {
    fn default() -> Self {
        Self {
            relay_buffer: default_relay_buffer(),
        }
    }
}
