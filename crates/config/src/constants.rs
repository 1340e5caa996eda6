//! Centralized constants for the chutils workspace.
//!
//! This module contains file names, markers and environment variable names
//! shared across crates to avoid string duplication.

// =============================================================================
// Project Discovery
// =============================================================================

/// Files or directories whose presence marks a directory as the project root.
///
/// Checked in order for every directory visited during the upward walk.
pub const PROJECT_MARKERS: &[&str] = &[
    "config.yml",
    "config.yaml",
    "config.ini",
    "Cargo.toml",
    "pyproject.toml",
    ".git",
];

/// Number of directories above the executable's directory used as the
/// fallback project root (`<root>/target/debug/<exe>` resolves to `<root>`).
pub const FALLBACK_ROOT_DEPTH: usize = 2;

// =============================================================================
// Config Files
// =============================================================================

/// Primary config file candidates, in priority order (YAML before INI).
pub const CONFIG_FILE_CANDIDATES: &[&str] = &["config.yml", "config.yaml", "config.ini"];

/// Infix inserted between the stem and extension of the local override file.
pub const LOCAL_OVERRIDE_INFIX: &str = "local";

/// Name of the flat `KEY=value` file consulted as a secret fallback.
pub const DOTENV_FILE_NAME: &str = ".env";

/// Name of the directory created under the project root for log files.
pub const LOG_DIR_NAME: &str = "logs";

/// General logging section name.
pub const LOGGING_SECTION: &str = "Logging";

// =============================================================================
// Environment Variables
// =============================================================================

/// Overrides project root discovery when set.
pub const ENV_PROJECT_ROOT: &str = "CHUTILS_PROJECT_ROOT";

/// Overrides primary config file discovery when set.
pub const ENV_CONFIG_PATH: &str = "CHUTILS_CONFIG_PATH";

/// Disables the `.env` secret fallback when set to `1` or `true`.
pub const ENV_DOTENV_DISABLED: &str = "DOTENV_DISABLED";
