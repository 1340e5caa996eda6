//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Build the `ConfigContext` described by the global options.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).

use std::path::PathBuf;

use chutils_config::ConfigContext;
use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "chutils")]
#[command(about = "Inspect project configuration, manage secrets and write log lines", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  chutils config path\n  chutils config get Database port\n  chutils config set Database port 6000\n  chutils secret get db_password\n  chutils log --level warning 'disk almost full'\n"
)]
pub struct Cli {
    /// Project root (skips the upward search for project markers).
    #[arg(long, global = true, env = "CHUTILS_PROJECT_ROOT", value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Primary configuration file (overrides config.yml/config.ini discovery).
    #[arg(long, global = true, env = "CHUTILS_CONFIG_PATH", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or modify configuration
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommand,
    },

    /// Manage secrets in the OS credential store
    Secret {
        #[command(subcommand)]
        command: commands::secret::SecretCommand,
    },

    /// Write one line through a configured logger
    Log(commands::log::LogArgs),
}

impl Cli {
    /// Configuration context for the global options.
    ///
    /// Blank values are ignored so the usual discovery applies.
    pub fn config_context(&self) -> ConfigContext {
        let mut ctx = ConfigContext::new();
        if let Some(root) = non_blank(self.project_root.as_ref()) {
            ctx = ctx.with_project_root(root);
        }
        if let Some(path) = non_blank(self.config_path.as_ref()) {
            ctx = ctx.with_config_path(path);
        }
        ctx
    }
}

fn non_blank(path: Option<&PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.to_string_lossy().trim().is_empty())
        .cloned()
}
