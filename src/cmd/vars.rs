// src/cmd/vars.rs

//! `cmdchain vars`: list, set or unset global `{{name}}` variables.

use clap::{Args, Subcommand};

use crate::errors::Result;
use crate::service::CommandService;

/// CLI arguments for `cmdchain vars [set|unset]`.
#[derive(Args, Debug, Clone)]
pub struct VarsArgs {
    #[command(subcommand)]
    pub action: Option<VarsAction>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum VarsAction {
    /// Set a variable.
    Set { name: String, value: String },
    /// Remove a variable.
    Unset { name: String },
}

pub fn execute_vars(service: &CommandService, args: VarsArgs) -> Result<()> {
    match args.action {
        None => {
            for (name, value) in service.variables()? {
                println!("{name}={value}");
            }
        }
        Some(VarsAction::Set { name, value }) => {
            service.set_variable(&name, &value)?;
        }
        Some(VarsAction::Unset { name }) => {
            service.delete_variable(&name)?;
        }
    }
    Ok(())
}
