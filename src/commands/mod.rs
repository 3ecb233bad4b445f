//! Command implementations for difflame.
//!
//! difflame has a single command, implemented in `run`.

mod run;

use crate::cli::Cli;
use crate::error::Result;

/// Run difflame for the parsed command line.
pub fn dispatch(cli: Cli) -> Result<()> {
    run::cmd_run(&cli)
}
