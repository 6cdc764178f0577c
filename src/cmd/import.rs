// src/cmd/import.rs

//! `cmdchain import`: load a deck of command definitions into the store.
//!
//! Existing commands (same id) are updated in place and keep their
//! run-produced fields; unknown ids are created. `--dry-run` only reports
//! what would happen.

use clap::Args;

use crate::config;
use crate::errors::{CmdchainError, Result};
use crate::service::CommandService;

/// CLI arguments for `cmdchain import <deck>`.
#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// Path to the deck file (TOML).
    pub deck: String,

    /// Validate and report only; change nothing.
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute_import(service: &CommandService, args: ImportArgs) -> Result<()> {
    let deck = config::load_deck(&args.deck)?;

    if args.dry_run {
        for (id, command) in deck.command.iter() {
            let action = match service.get_command(id) {
                Ok(_) => "update",
                Err(CmdchainError::CommandNotFound(_)) => "create",
                Err(err) => return Err(err),
            };
            println!("{action}: {id} ({})", command.name.as_deref().unwrap_or(id));
        }
        return Ok(());
    }

    let mut created = 0usize;
    let mut updated = 0usize;
    for (id, command) in deck.command {
        let def = command.into_definition(&id);
        match service.get_command(&id) {
            Ok(_) => {
                service.update_command(def)?;
                updated += 1;
            }
            Err(CmdchainError::CommandNotFound(_)) => {
                service.create_command(def)?;
                created += 1;
            }
            Err(err) => return Err(err),
        }
    }
    println!("imported {} command(s): {created} created, {updated} updated", created + updated);
    Ok(())
}
