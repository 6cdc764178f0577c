// src/cmd/mod.rs

//! Subcommand implementations.
//!
//! Each subcommand module exposes its clap `Args` struct and one public
//! `execute_*` function; `lib.rs` wires the service and dispatches here.
//! Only `run` is async (it streams events); everything else is plain
//! synchronous store work.

pub mod delete;
pub mod history;
pub mod import;
pub mod list;
pub mod regex;
pub mod run;
pub mod show;
pub mod vars;

pub use delete::{DeleteArgs, execute_delete};
pub use history::{HistoryArgs, execute_history};
pub use import::{ImportArgs, execute_import};
pub use list::{ListArgs, execute_list};
pub use regex::{TestRegexArgs, execute_test_regex};
pub use run::{RunArgs, execute_run};
pub use show::{ShowArgs, execute_show};
pub use vars::{VarsAction, VarsArgs, execute_vars};
