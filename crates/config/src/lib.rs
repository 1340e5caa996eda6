//! Layered project configuration for chutils.
//!
//! This crate discovers a project root, loads `config.yml` / `config.yaml` /
//! `config.ini` with an optional `<stem>.local.<ext>` override deep-merged on
//! top, caches the result and exposes typed accessors with fallbacks. Single
//! values can be written back to disk without disturbing comments or layout.
//!
//! The free functions operate on [`ConfigContext::global`]; construct a
//! [`ConfigContext`] directly for an isolated instance.

mod accessors;
pub mod constants;
mod loader;
mod paths;
pub mod persistence;
mod root;
mod types;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub use serde_yaml::{Mapping, Value};

pub use accessors::scalar_to_string;
pub use loader::{
    ConfigContext, ConfigError, IniError, deep_merge, deep_merge_values, dotenv_disabled,
    env_var_or_none, parse_ini,
};
pub use paths::resolve_config_paths;
pub use persistence::SaveError;
pub use root::{fallback_root, locate_project_root, locate_root_or_fallback};
pub use types::{Config, ConfigFormat, ConfigPaths, local_override_path};

/// The merged configuration of the process-default context.
pub fn get_config() -> Arc<Config> {
    ConfigContext::global().get_config()
}

/// Reload the process-default configuration from disk.
pub fn load_config() -> Arc<Config> {
    ConfigContext::global().load_config()
}

/// Clear the process-default root, paths and configuration caches.
pub fn reset() {
    ConfigContext::global().reset()
}

pub fn get_value(section: &str, key: &str, fallback: impl Into<Value>) -> Value {
    ConfigContext::global().get_value(section, key, fallback)
}

pub fn get_string(section: &str, key: &str, fallback: &str) -> String {
    ConfigContext::global().get_string(section, key, fallback)
}

pub fn get_int(section: &str, key: &str, fallback: i64) -> i64 {
    ConfigContext::global().get_int(section, key, fallback)
}

pub fn get_float(section: &str, key: &str, fallback: f64) -> f64 {
    ConfigContext::global().get_float(section, key, fallback)
}

pub fn get_boolean(section: &str, key: &str, fallback: bool) -> bool {
    ConfigContext::global().get_boolean(section, key, fallback)
}

pub fn get_list(section: &str, key: &str, fallback: Vec<String>) -> Vec<String> {
    ConfigContext::global().get_list(section, key, fallback)
}

pub fn get_section(name: &str) -> Mapping {
    ConfigContext::global().get_section(name)
}

pub fn get_multiple(section: &str, keys: &[&str]) -> BTreeMap<String, Option<Value>> {
    ConfigContext::global().get_multiple(section, keys)
}

/// Write one value to `file_path`, or to the process-default primary config.
///
/// The cached configuration is not updated; call [`load_config`] afterwards
/// to read the new value back.
pub fn save_value(
    section: &str,
    key: &str,
    value: impl Into<Value>,
    file_path: Option<&Path>,
) -> bool {
    match file_path {
        Some(path) => persistence::save_value(path, section, key, &value.into()),
        None => ConfigContext::global().save_value(section, key, value),
    }
}
