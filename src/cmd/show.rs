// src/cmd/show.rs

//! `cmdchain show`: one command in full, captured output included.

use clap::Args;

use crate::errors::Result;
use crate::model::{Argument, ArgumentKind};
use crate::service::CommandService;

/// CLI arguments for `cmdchain show <id>`.
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Command id.
    pub id: String,
}

pub fn execute_show(service: &CommandService, args: ShowArgs) -> Result<()> {
    let def = service.get_command(&args.id)?;

    println!("id:          {}", def.id);
    println!("name:        {}", def.name);
    println!("executable:  {}", def.executable);
    println!("status:      {}", def.status);
    if let Some(code) = def.return_code {
        println!("return code: {code}");
    }
    if let Some(generated) = &def.generated_command {
        println!("generated:   {generated}");
    }
    if let Some(dir) = &def.working_directory {
        println!("working dir: {dir}");
    }
    if let Some(position) = def.position {
        println!("position:    {position}");
    }
    if !def.depends_on.is_empty() {
        println!("depends on:  {}", def.depends_on.join(", "));
    }

    if !def.arguments.is_empty() {
        println!("arguments:");
        for arg in &def.arguments {
            println!("  {}", describe_argument(arg));
        }
    }

    if !def.output.is_empty() {
        println!("output:");
        for line in &def.output {
            println!("  {line}");
        }
    }
    if !def.error_output.is_empty() {
        println!("error output:");
        for line in &def.error_output {
            println!("  {line}");
        }
    }
    Ok(())
}

fn describe_argument(arg: &Argument) -> String {
    let mut out = match arg.kind {
        ArgumentKind::Static => format!("static   {} {}", arg.name, arg.value),
        ArgumentKind::Variable => format!(
            "variable {} <- {} /{}/",
            arg.name,
            arg.source_command_id.as_deref().unwrap_or("?"),
            arg.regex.as_deref().unwrap_or("?"),
        ),
    };
    if let Some(joiner) = &arg.joiner {
        out.push_str(&format!(" (joiner {joiner:?})"));
    }
    if arg.is_positional {
        out.push_str(" (positional)");
    }
    if !arg.enabled {
        out.push_str(" (disabled)");
    }
    out
}
