//! Error types for secret storage.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecretError {
    /// The service name was empty or whitespace-only.
    #[error("service name must be a non-empty string")]
    EmptyServiceName,

    #[error("credential store error: {0}")]
    Keyring(#[from] keyring::Error),

    /// A `.env` file could not be read. Never carries line contents.
    #[error("failed to read {path}: {message}")]
    Dotenv { path: PathBuf, message: String },
}
