//! Write a single line through a configured logger.

use anyhow::Result;
use chutils_config::ConfigContext;
use chutils_logging::{DEFAULT_LOGGER_NAME, LoggerOptions, LoggerRegistry, Severity};
use clap::Args;

#[derive(Args)]
pub struct LogArgs {
    /// Logger name
    #[arg(short, long, default_value = DEFAULT_LOGGER_NAME)]
    pub name: String,

    /// Message severity (DEVDEBUG, DEBUG, MEDIUMDEBUG, INFO, WARNING, ERROR, CRITICAL)
    #[arg(short, long, default_value = "INFO")]
    pub level: Severity,

    /// Config section holding this logger's settings
    #[arg(long)]
    pub section: Option<String>,

    /// Log file name inside <project root>/logs
    #[arg(long)]
    pub file: Option<String>,

    /// Message to write
    pub message: String,
}

pub fn run(args: LogArgs, ctx: &ConfigContext) -> Result<()> {
    let mut options = LoggerOptions::new();
    if let Some(section) = args.section {
        options = options.with_config_section(section);
    }
    if let Some(file) = args.file {
        options = options.with_log_file_name(file);
    }

    let registry = LoggerRegistry::new(ctx);
    let logger = registry.setup_logger(&args.name, &options);
    if !logger.is_enabled_for(args.level) {
        tracing::debug!(
            logger = %args.name,
            level = %args.level,
            threshold = %logger.level(),
            "Message is below the logger threshold"
        );
    }
    logger.log(args.level, &args.message);
    logger.flush();
    Ok(())
}
