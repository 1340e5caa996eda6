//! Environment variable overrides for discovery.
//!
//! Responsibilities:
//! - Read environment variables with empty/whitespace filtering.
//! - Expose the root and config-path overrides used by `ConfigContext`.
//!
//! Does NOT handle:
//! - Builder overrides (they take precedence and are checked by the caller).
//! - `.env` files (the secrets crate reads those).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).

use std::path::PathBuf;

use crate::constants::{ENV_CONFIG_PATH, ENV_DOTENV_DISABLED, ENV_PROJECT_ROOT};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            // No trimming needed, return original to avoid allocation
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Project root forced via `CHUTILS_PROJECT_ROOT`.
pub(crate) fn project_root_override() -> Option<PathBuf> {
    env_var_or_none(ENV_PROJECT_ROOT).map(PathBuf::from)
}

/// Primary config file forced via `CHUTILS_CONFIG_PATH`.
pub(crate) fn config_path_override() -> Option<PathBuf> {
    env_var_or_none(ENV_CONFIG_PATH).map(PathBuf::from)
}

/// Whether `.env` loading is disabled via `DOTENV_DISABLED`.
pub fn dotenv_disabled() -> bool {
    matches!(
        env_var_or_none(ENV_DOTENV_DISABLED).as_deref(),
        Some("true") | Some("1")
    )
}
