// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::deck::{DeckFile, RawDeckFile};
use crate::config::model::Settings;
use crate::errors::Result;

/// Load the settings file.
///
/// With an explicit path the file must exist. With `None` the default path
/// is tried, and a missing file simply means default settings; running in a
/// directory without a `cmdchain.toml` is the normal case.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (default_settings_path(), false),
    };

    if !required && !path.is_file() {
        debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(&path)?;
    let settings: Settings = toml::from_str(&contents)?;
    debug!(path = %path.display(), "settings loaded");
    Ok(settings)
}

/// Load a deck file and run semantic validation on it.
pub fn load_deck(path: impl AsRef<Path>) -> Result<DeckFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawDeckFile = toml::from_str(&contents)?;
    let deck = DeckFile::try_from(raw)?;
    Ok(deck)
}

/// Default settings path: `cmdchain.toml` in the current working directory.
pub fn default_settings_path() -> PathBuf {
    PathBuf::from("cmdchain.toml")
}
