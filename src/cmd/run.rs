// src/cmd/run.rs

//! `cmdchain run`: resolve, start and live-stream one command.
//!
//! Relayed stdout goes to stdout, relayed stderr to stderr, so the command
//! behaves like it would have when run directly. The first Ctrl-C asks the
//! supervisor to stop the process group gracefully; a second one gives up
//! waiting and exits.
//!
//! Exit code: the command's own success is 0, a stop is 130 (the usual
//! `128 + SIGINT` convention), everything else is 1.

use clap::Args;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::errors::{CmdchainError, Result};
use crate::events::Event;
use crate::service::CommandService;
use crate::types::{CommandStatus, StreamKind};

/// CLI arguments for `cmdchain run <id>`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Command id.
    pub id: String,
}

pub async fn execute_run(service: &CommandService, args: RunArgs) -> Result<i32> {
    // Subscribe before starting so no event can slip past.
    let mut events = service.events().subscribe();
    let def = service.run_command(&args.id)?;

    // Echo the seeded `$ <command>` line; relayed lines follow via events.
    if let Some(first) = def.output.first() {
        println!("{first}");
    }

    let mut stop_sent = false;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(Event::OutputLine { command_id, stream, line }) if command_id == args.id => {
                    match stream {
                        StreamKind::Stdout => println!("{line}"),
                        StreamKind::Stderr => eprintln!("{line}"),
                    }
                }
                Ok(Event::StatusChanged { command_id, status, return_code })
                    if command_id == args.id && status.is_terminal() =>
                {
                    let code = return_code
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "?".to_string());
                    eprintln!("{}: {} (return code {})", args.id, status, code);
                    return Ok(exit_code_for(status));
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event stream lagged; `cmdchain show` has the full output");
                }
                Err(RecvError::Closed) => return Ok(1),
            },
            _ = tokio::signal::ctrl_c() => {
                if stop_sent {
                    // Second Ctrl-C: stop waiting. The group already has its
                    // signal; the store will record the outcome.
                    return Ok(130);
                }
                stop_sent = true;
                eprintln!("stopping {}...", args.id);
                match service.stop_command(&args.id) {
                    // Already exited between the signal and our request.
                    Ok(()) | Err(CmdchainError::NotRunning(_)) => {}
                    Err(err) => return Err(err),
                }
            }
        }
    }
}

fn exit_code_for(status: CommandStatus) -> i32 {
    match status {
        CommandStatus::Success => 0,
        CommandStatus::Stopped => 130,
        _ => 1,
    }
}
