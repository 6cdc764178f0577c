// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! NOTE: this expects `clap` to be built with the `derive` feature, e.g.:
//! `clap = { version = "4.5.53", features = ["derive"] }` in `Cargo.toml`.

use clap::{Parser, Subcommand, ValueEnum};

use crate::cmd::{
    DeleteArgs, HistoryArgs, ImportArgs, ListArgs, RunArgs, ShowArgs, TestRegexArgs, VarsArgs,
};

/// Command-line arguments for `cmdchain`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cmdchain",
    version,
    about = "Define, chain and run reusable shell command templates.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the settings file (TOML).
    ///
    /// Default: `cmdchain.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CMDCHAIN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Load command definitions from a deck file into the store.
    Import(ImportArgs),

    /// List stored commands with their status.
    List(ListArgs),

    /// Show one command in full, including its captured output.
    Show(ShowArgs),

    /// Resolve and run a command, streaming its output. Ctrl-C stops the
    /// whole process group.
    Run(RunArgs),

    /// Delete a command and its argument history.
    Delete(DeleteArgs),

    /// Show recent values used for one argument of a command.
    History(HistoryArgs),

    /// List or edit global {{name}} variables.
    Vars(VarsArgs),

    /// Try an extraction regex against sample output.
    TestRegex(TestRegexArgs),
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
