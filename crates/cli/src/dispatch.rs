//! Command dispatch logic.
//!
//! Responsibilities:
//! - Build the configuration context from global options.
//! - Route parsed CLI arguments to the command handlers.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//!
//! Invariants:
//! - Every command sees the same `ConfigContext`.

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::commands;

pub(crate) fn run_command(cli: Cli) -> Result<()> {
    let ctx = cli.config_context();
    match cli.command {
        Commands::Config { command } => commands::config::run(command, &ctx),
        Commands::Secret { command } => commands::secret::run(command, &ctx),
        Commands::Log(args) => commands::log::run(args, &ctx),
    }
}
