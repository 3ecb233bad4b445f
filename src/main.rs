//! Difflame: a diff between two revisions, annotated with blame.
//!
//! This is the main entry point for the `difflame` CLI. It parses arguments,
//! runs the annotation, and handles errors with proper exit codes.

mod cli;
mod commands;
pub mod annotate;
pub mod blame;
pub mod config;
pub mod context;
pub mod diff;
pub mod error;
pub mod exit_codes;
pub mod git;
pub mod session;
pub mod trace;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
