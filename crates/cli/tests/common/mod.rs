//! Shared test utilities for chutils integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents `.env` fallback.
//! - Provide throwaway project directories.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper are hermetic by default.
//! - Host `CHUTILS_*` variables never leak into a test.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

/// Returns a hermetic `chutils` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - Discovery overrides and `RUST_LOG` from the host are cleared.
pub fn chutils_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("chutils");

    cmd.env("DOTENV_DISABLED", "1");

    cmd.env_remove("CHUTILS_PROJECT_ROOT")
        .env_remove("CHUTILS_CONFIG_PATH")
        .env_remove("RUST_LOG");

    cmd
}

/// Returns a hermetic command rooted at `root` via `--project-root`.
pub fn chutils_in(root: &Path) -> Command {
    let mut cmd = chutils_cmd();
    cmd.arg("--project-root").arg(root);
    cmd
}

/// A temporary project directory containing the given files.
#[allow(dead_code)]
pub fn project(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    for (name, content) in files {
        fs::write(temp_dir.path().join(name), content).expect("Failed to write project file");
    }
    temp_dir
}
