//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for reading and parsing config files.
//! - Carry the offending path for diagnostics.
//!
//! Does NOT handle:
//! - Errors from writing config files (see `persistence`).
//!
//! Invariants:
//! - These errors never escape the public loading API: the context logs them
//!   and substitutes an empty mapping.
//! - All variants include the file path for debugging.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a single config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config file at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to parse INI config file at {path}: {source}")]
    IniParse { path: PathBuf, source: IniError },

    #[error("Config file at {path} must contain a mapping at the top level")]
    NotAMapping { path: PathBuf },
}

/// Syntax errors found by the INI parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IniError {
    #[error("line {line}: key-value pair found before any section header")]
    MissingSectionHeader { line: usize },

    #[error("line {line}: malformed section header")]
    MalformedHeader { line: usize },

    #[error("line {line}: expected 'key = value' or 'key: value'")]
    MalformedLine { line: usize },

    #[error("line {line}: duplicate section '{section}'")]
    DuplicateSection { line: usize, section: String },

    #[error("line {line}: duplicate key '{key}' in section '{section}'")]
    DuplicateKey {
        line: usize,
        section: String,
        key: String,
    },
}
