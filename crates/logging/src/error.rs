//! Error types for logger construction.
//!
//! Invariants:
//! - These errors never escape `setup_logger`: the registry logs them and
//!   continues with the sinks it could build.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to open log file at {path}: {source}")]
    OpenLogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create log directory at {path}: {source}")]
    CreateLogDir {
        path: PathBuf,
        source: std::io::Error,
    },
}
