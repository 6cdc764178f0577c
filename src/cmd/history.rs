// src/cmd/history.rs

//! `cmdchain history`: recent values used for an argument, or recent
//! working directories with `--dirs`.

use clap::Args;

use crate::errors::{CmdchainError, Result};
use crate::service::CommandService;

/// CLI arguments for `cmdchain history <id> <argument>`.
#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Command id.
    #[arg(required_unless_present = "dirs")]
    pub id: Option<String>,

    /// Argument name.
    #[arg(required_unless_present = "dirs")]
    pub argument: Option<String>,

    /// Show recent working directories instead.
    #[arg(long, conflicts_with_all = ["id", "argument"])]
    pub dirs: bool,
}

pub fn execute_history(service: &CommandService, args: HistoryArgs) -> Result<()> {
    if args.dirs {
        for dir in service.working_dir_history()? {
            println!("{dir}");
        }
        return Ok(());
    }

    // clap enforces presence unless --dirs was given.
    let (Some(id), Some(argument)) = (args.id.as_deref(), args.argument.as_deref()) else {
        return Err(CmdchainError::ConfigError(
            "history needs a command id and an argument name".to_string(),
        ));
    };

    for value in service.argument_history(id, argument)? {
        println!("{value}");
    }
    Ok(())
}
