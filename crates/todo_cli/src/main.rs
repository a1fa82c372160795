//! `todo` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, start logging and open the task database.
//! - Map command outcomes to process exit codes.

mod args;
mod commands;
mod render;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = args::Cli::parse();
    let outcome = commands::run(cli);
    todo_core::flush_logging();
    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
