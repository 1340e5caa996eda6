//! Error types for config file mutation.
//!
//! Responsibilities:
//! - Describe why a single-value write could not be completed.
//!
//! Does NOT handle:
//! - Errors while loading configuration (see `loader::error`).
//!
//! Invariants:
//! - These errors are logged by `save_value` and surfaced as `false`; they are
//!   public so that the pure rewrite functions can be used directly.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while updating one value in a config file.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Config file not found at {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML document: {0}")]
    YamlParse(#[source] serde_yaml::Error),

    #[error("Failed to serialize YAML document: {0}")]
    YamlSerialize(#[source] serde_yaml::Error),

    #[error("YAML document must contain a mapping at the top level")]
    NotAMapping,

    #[error("Section '{section}' exists but is not a mapping")]
    SectionNotAMapping { section: String },

    #[error("Value for '{section}.{key}' cannot be represented in an INI file")]
    UnsupportedIniValue { section: String, key: String },
}
