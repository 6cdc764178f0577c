// src/lib.rs

pub mod cli;
pub mod cmd;
pub mod config;
pub mod errors;
pub mod events;
pub mod exec;
pub mod logging;
pub mod model;
pub mod resolve;
pub mod service;
pub mod status;
pub mod store;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::cli::{CliArgs, Commands};
use crate::config::model::Settings;
use crate::errors::Result;
use crate::events::EventHub;
use crate::service::CommandService;
use crate::store::{FileStore, MemoryStore, StateStore};
use crate::types::StoreMode;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings loading
/// - the state store backend
/// - the event hub and the command service
///
/// and dispatches to the subcommand. The returned value is the process exit
/// code; only `run` and `test-regex` produce non-zero codes of their own.
pub async fn run(args: CliArgs) -> Result<i32> {
    let settings = config::load_settings(args.config.as_deref().map(Path::new))?;
    let store = build_store(&settings)?;
    let events = EventHub::new(settings.events.capacity);
    let service = CommandService::new(store, events, &settings.exec);

    match args.command {
        Commands::Import(a) => cmd::execute_import(&service, a).map(|()| 0),
        Commands::List(a) => cmd::execute_list(&service, a).map(|()| 0),
        Commands::Show(a) => cmd::execute_show(&service, a).map(|()| 0),
        Commands::Run(a) => cmd::execute_run(&service, a).await,
        Commands::Delete(a) => cmd::execute_delete(&service, a).map(|()| 0),
        Commands::History(a) => cmd::execute_history(&service, a).map(|()| 0),
        Commands::Vars(a) => cmd::execute_vars(&service, a).map(|()| 0),
        Commands::TestRegex(a) => cmd::execute_test_regex(&service, a),
    }
}

fn build_store(settings: &Settings) -> Result<Arc<dyn StateStore>> {
    match settings.store.mode {
        StoreMode::Memory => {
            debug!("using in-memory store; state will not outlive this process");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreMode::File => Ok(Arc::new(FileStore::open(&settings.store.path)?)),
    }
}
