//! Config file resolution inside a project root.
//!
//! Responsibilities:
//! - Pick the primary config file (YAML preferred over INI).
//! - Pick the same-format local override beside it.
//!
//! Does NOT handle:
//! - Finding the project root (see `root.rs`).
//! - Reading file contents (see `loader`).
//!
//! Invariants:
//! - Absence of a config file is not an error; it is logged at info level.
//! - The local override always shares the primary's extension.

use std::path::Path;

use crate::constants::CONFIG_FILE_CANDIDATES;
use crate::types::ConfigPaths;

/// Resolve the primary and local config files under `root`.
pub fn resolve_config_paths(root: &Path) -> ConfigPaths {
    let Some(primary) = CONFIG_FILE_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
    else {
        tracing::info!(
            root = %root.display(),
            candidates = ?CONFIG_FILE_CANDIDATES,
            "No config file found in project root; defaults will be used"
        );
        return ConfigPaths::default();
    };

    let paths = ConfigPaths::for_file(primary);
    tracing::debug!(
        primary = ?paths.primary,
        local = ?paths.local,
        "Resolved config file paths"
    );
    paths
}
