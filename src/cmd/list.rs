// src/cmd/list.rs

//! `cmdchain list`: all stored commands, live status merged in.

use clap::Args;

use crate::errors::Result;
use crate::service::CommandService;

/// CLI arguments for `cmdchain list`.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {}

pub fn execute_list(service: &CommandService, _args: ListArgs) -> Result<()> {
    let commands = service.list_commands()?;
    if commands.is_empty() {
        println!("no commands stored");
        return Ok(());
    }

    for def in commands {
        let position = def
            .position
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<28} {:<8} {:<4} {}",
            def.id,
            def.status.to_string(),
            position,
            def.name
        );
    }
    Ok(())
}
