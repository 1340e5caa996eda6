//! chutils - command-line front end for project configuration, secrets and logging.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Run config, secret and log commands against the discovered project.
//!
//! Does NOT handle:
//! - Config discovery, merging or writing (see `crates/config`).
//! - Logger construction (see `crates/logging`).
//!
//! Invariants:
//! - Diagnostics go to stderr; stdout carries only command output.
//! - Global options (like `--project-root`) apply to every subcommand.

mod args;
mod commands;
mod dispatch;
mod error;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run_command(cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
