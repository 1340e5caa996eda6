//! Configuration loading: parsing, merging and caching.
//!
//! Responsibilities:
//! - Parse primary and local config files (YAML or INI).
//! - Deep-merge the local override onto the primary.
//! - Cache the merged result in an owned `ConfigContext`.
//!
//! Does NOT handle:
//! - Persisting changes back to disk (see `persistence`).
//! - Typed value access (see `accessors.rs`).
//!
//! Invariants / Assumptions:
//! - Local values take precedence over primary values at every depth.
//! - Parse failures are logged and replaced with an empty mapping.

mod context;
mod env;
mod error;
mod file;
mod ini;
mod merge;

pub use context::ConfigContext;
pub use env::{dotenv_disabled, env_var_or_none};
pub use error::{ConfigError, IniError};
pub use ini::parse_ini;
pub use merge::{deep_merge, deep_merge_values};

pub(crate) use ini::{parse_header, split_key_value};

#[cfg(test)]
mod tests;
