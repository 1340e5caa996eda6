//! Named loggers with extra debug levels and rotating file output.
//!
//! Loggers are configured from the `Logging` section (or a per-logger
//! section) of the project configuration, write to stderr and to
//! `<project root>/logs/<file>`, and rotate that file by time or size with
//! optional gzip compression of backups.
//!
//! ```no_run
//! use chutils_logging::{LoggerOptions, Severity, setup_logger};
//!
//! let log = setup_logger("app_logger", &LoggerOptions::new().with_level(Severity::MediumDebug));
//! log.mediumdebug("loaded 3 plugins");
//! let total = log.trace_call("sum", || 2 + 3);
//! assert_eq!(total, 5);
//! ```

mod error;
mod level;
mod logger;
mod options;
mod record;
mod registry;
pub mod sink;

pub use error::LoggingError;
pub use level::{Severity, UnknownSeverity};
pub use logger::Logger;
pub use options::{
    DEFAULT_BACKUP_COUNT, DEFAULT_LOG_FILE_NAME, DEFAULT_LOGGER_NAME, DEFAULT_MAX_BYTES,
    LoggerOptions, LoggerSettings, RotationKind, keys, resolve_settings,
};
pub use record::{Record, TIMESTAMP_FORMAT};
pub use registry::{LoggerRegistry, setup_logger};
pub use sink::{ConsoleSink, FileSinkOptions, RotatingFileSink, RotationPolicy, RotationWhen, Sink};
