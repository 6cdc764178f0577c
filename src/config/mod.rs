// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Two different TOML shapes live here:
//! - `model.rs`: the settings file (`cmdchain.toml`) controlling the store
//!   backend, event hub capacity and relay buffering.
//! - `deck.rs`: deck files, i.e. batches of command definitions that
//!   `cmdchain import` loads into the store.
//!
//! Loading (`loader.rs`) only deserializes; semantic checks (empty
//! executables, self-references, dependency cycles) live in `validate.rs`
//! behind `TryFrom`, same split as for the raw/validated pairs.

pub mod deck;
pub mod loader;
pub mod model;
pub mod validate;

pub use deck::{DeckFile, RawDeckFile};
pub use loader::{default_settings_path, load_deck, load_settings};
pub use model::{EventsSection, ExecSection, Settings, StoreSection};
