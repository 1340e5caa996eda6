//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map command failures to exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.

use chutils_secrets::SecretError;
use thiserror::Error;

/// Structured exit codes for chutils.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - write failed or unhandled failure.
    GeneralError = 1,

    /// Not found - config key or secret does not exist.
    NotFound = 4,

    /// Validation error - bad input such as an empty service name.
    ValidationError = 5,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

/// Failures raised by command handlers.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Failed(String),
}

impl From<&CommandError> for ExitCode {
    fn from(err: &CommandError) -> Self {
        match err {
            CommandError::NotFound(_) => ExitCode::NotFound,
            CommandError::Invalid(_) => ExitCode::ValidationError,
            CommandError::Failed(_) => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<CommandError>() {
                return ExitCode::from(err);
            }
            if let Some(SecretError::EmptyServiceName) = cause.downcast_ref::<SecretError>() {
                return ExitCode::ValidationError;
            }
        }
        ExitCode::GeneralError
    }
}
