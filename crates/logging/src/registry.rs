//! Logger construction and per-name caching.
//!
//! Responsibilities:
//! - Build loggers from resolved settings: console sink plus rotating file sink.
//! - Create and cache the `<project root>/logs` directory.
//! - Return the existing logger for a name unless reconfiguration is forced.
//! - Emit the one-time initialization notice.
//!
//! Does NOT handle:
//! - Setting resolution (see `options`).
//!
//! Invariants:
//! - At most one `Logger` exists per name per registry.
//! - Reconfiguring keeps the same `Arc<Logger>`, so earlier handles see the
//!   new sinks and level.
//! - A log directory or file that cannot be opened disables file output only.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use chutils_config::ConfigContext;
use chutils_config::constants::LOG_DIR_NAME;

use crate::error::LoggingError;
use crate::logger::Logger;
use crate::options::{LoggerOptions, LoggerSettings, resolve_settings};
use crate::sink::{ConsoleSink, RotatingFileSink};

/// Named loggers built against one configuration context.
#[derive(Debug)]
pub struct LoggerRegistry<'c> {
    config: &'c ConfigContext,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
    log_dir: Mutex<Option<PathBuf>>,
    init_notice_shown: AtomicBool,
}

impl LoggerRegistry<'static> {
    /// The registry bound to the process-default configuration.
    pub fn global() -> &'static LoggerRegistry<'static> {
        static GLOBAL: OnceLock<LoggerRegistry<'static>> = OnceLock::new();
        GLOBAL.get_or_init(|| LoggerRegistry::new(ConfigContext::global()))
    }
}

impl<'c> LoggerRegistry<'c> {
    pub fn new(config: &'c ConfigContext) -> Self {
        Self {
            config,
            loggers: Mutex::new(HashMap::new()),
            log_dir: Mutex::new(None),
            init_notice_shown: AtomicBool::new(false),
        }
    }

    fn loggers(&self) -> MutexGuard<'_, HashMap<String, Arc<Logger>>> {
        self.loggers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// An already configured logger, if any.
    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers().get(name).cloned()
    }

    /// `<project root>/logs`, created on first use.
    ///
    /// Only a successfully created directory is cached.
    pub fn log_dir(&self) -> Result<PathBuf, LoggingError> {
        let mut cached = self.log_dir.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(dir) = cached.as_ref() {
            return Ok(dir.clone());
        }
        let dir = self.config.project_root().join(LOG_DIR_NAME);
        if !dir.is_dir() {
            std::fs::create_dir_all(&dir).map_err(|e| LoggingError::CreateLogDir {
                path: dir.clone(),
                source: e,
            })?;
            tracing::info!(path = %dir.display(), "Created log directory");
        }
        *cached = Some(dir.clone());
        Ok(dir)
    }

    /// Return the logger called `name`, configuring it on first use.
    pub fn setup_logger(&self, name: &str, options: &LoggerOptions) -> Arc<Logger> {
        let mut loggers = self.loggers();
        let existing = loggers.get(name).cloned();
        if let Some(logger) = &existing
            && !options.force_reconfigure()
        {
            return Arc::clone(logger);
        }

        let config = self.config.get_config();
        let settings = resolve_settings(&config, options);

        let logger = match existing {
            Some(logger) => {
                logger.clear_sinks();
                logger.set_level(settings.level);
                logger
            }
            None => Arc::new(Logger::new(name, settings.level)),
        };
        self.attach_sinks(&logger, &settings);
        loggers.insert(name.to_string(), Arc::clone(&logger));
        logger
    }

    fn attach_sinks(&self, logger: &Logger, settings: &LoggerSettings) {
        if settings.console {
            logger.add_sink(ConsoleSink::stderr());
        }

        if settings.log_file_name.is_empty() {
            return;
        }

        let dir = match self.log_dir() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::error!(error = %e, "Log directory unavailable");
                if !self.init_notice_shown.swap(true, Ordering::Relaxed) {
                    logger.warning("Log directory is not available. File logging is disabled.");
                }
                return;
            }
        };

        let path = dir.join(&settings.log_file_name);
        match RotatingFileSink::new(
            &path,
            settings.rotation,
            settings.backup_count,
            settings.compress,
            settings.file_options,
        ) {
            Ok(sink) => {
                logger.add_sink(sink);
                if !self.init_notice_shown.swap(true, Ordering::Relaxed) {
                    logger.info(format_args!(
                        "Logging configured. Level: {}. File: {}, rotation: {}, backups: {}.",
                        settings.level,
                        path.display(),
                        settings.rotation,
                        settings.backup_count
                    ));
                }
            }
            Err(e) => {
                logger.error(format_args!("Failed to set up file logging: {e}"));
            }
        }
    }
}

/// Configure (or fetch) `name` on the process-default registry.
pub fn setup_logger(name: &str, options: &LoggerOptions) -> Arc<Logger> {
    LoggerRegistry::global().setup_logger(name, options)
}
