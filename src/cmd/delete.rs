// src/cmd/delete.rs

//! `cmdchain delete`: remove a command and its argument history.

use clap::Args;

use crate::errors::Result;
use crate::service::CommandService;

/// CLI arguments for `cmdchain delete <id>`.
#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Command id.
    pub id: String,
}

pub fn execute_delete(service: &CommandService, args: DeleteArgs) -> Result<()> {
    service.delete_command(&args.id)?;
    println!("deleted {}", args.id);
    Ok(())
}
