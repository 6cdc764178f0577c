// src/cmd/regex.rs

//! `cmdchain test-regex`: probe an extraction pattern before wiring it into
//! a variable argument.
//!
//! The sample text comes from a stored command's captured output
//! (`--command`), a file (`--file`) or stdin. Prints the extracted value and
//! exits 0 on a match; exits 1 when the pattern matches nothing.

use std::io::Read;

use clap::Args;

use crate::errors::Result;
use crate::service::CommandService;

/// CLI arguments for `cmdchain test-regex <pattern>`.
#[derive(Args, Debug, Clone)]
pub struct TestRegexArgs {
    /// Extraction pattern (group 1 wins over the whole match).
    pub pattern: String,

    /// Use the captured output of this stored command as the sample.
    #[arg(long, value_name = "ID", conflicts_with = "file")]
    pub command: Option<String>,

    /// Read the sample from a file instead of stdin.
    #[arg(long, value_name = "PATH")]
    pub file: Option<String>,
}

pub fn execute_test_regex(service: &CommandService, args: TestRegexArgs) -> Result<i32> {
    let sample = if let Some(id) = &args.command {
        service.get_command(id)?.output.join("\n")
    } else if let Some(path) = &args.file {
        std::fs::read_to_string(path)?
    } else {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    };

    match service.test_regex(&args.pattern, &sample)? {
        Some(value) => {
            println!("{value}");
            Ok(0)
        }
        None => {
            eprintln!("no match");
            Ok(1)
        }
    }
}
