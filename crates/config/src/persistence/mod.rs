//! Writing single values back to config files.
//!
//! Responsibilities:
//! - Dispatch to the INI or YAML rewrite based on the file extension.
//! - Replace the file atomically (temp file + rename).
//! - Report success as a boolean, logging the reason for any failure.
//!
//! Does NOT handle:
//! - Cache invalidation: no `ConfigContext` is touched. Reload explicitly to
//!   observe a saved value through the accessors.
//! - Local override files: only the given path is written.
//!
//! Invariants:
//! - A missing target file is never created; the call returns `false`.
//! - On failure the original file content is left in place.

mod error;
mod ini;
mod yaml;

use std::fs;
use std::path::Path;

use serde_yaml::Value;

pub use error::SaveError;
pub use ini::update_ini;
pub use yaml::update_yaml;

use crate::types::ConfigFormat;

/// Write `value` to `section.key` in the config file at `path`.
///
/// Returns `true` when the file was rewritten.
pub fn save_value(path: &Path, section: &str, key: &str, value: &Value) -> bool {
    match try_save_value(path, section, key, value) {
        Ok(()) => {
            tracing::info!(
                path = %path.display(),
                section,
                key,
                "Saved config value"
            );
            true
        }
        Err(e @ SaveError::NotFound { .. }) => {
            tracing::warn!(error = %e, section, key, "Cannot save config value");
            false
        }
        Err(e) => {
            tracing::error!(error = %e, section, key, "Failed to save config value");
            false
        }
    }
}

/// Fallible form of [`save_value`].
pub fn try_save_value(path: &Path, section: &str, key: &str, value: &Value) -> Result<(), SaveError> {
    if !path.is_file() {
        return Err(SaveError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| SaveError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let updated = match ConfigFormat::from_path(path) {
        ConfigFormat::Yaml => update_yaml(&content, section, key, value)?,
        ConfigFormat::Ini => update_ini(&content, section, key, value)?,
    };

    atomic_write(path, &updated)
}

fn atomic_write(path: &Path, content: &str) -> Result<(), SaveError> {
    let write_err = |e| SaveError::Write {
        path: path.to_path_buf(),
        source: e,
    };

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, content).map_err(write_err)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(write_err(e));
    }

    tracing::debug!(path = %path.display(), "Config file replaced atomically");
    Ok(())
}
