//! Project root discovery.
//!
//! Responsibilities:
//! - Walk upward from a start directory looking for project markers.
//! - Provide the fallback root used when no marker is found.
//!
//! Does NOT handle:
//! - Caching the result (see `loader::context`).
//! - Choosing config files inside the root (see `paths.rs`).
//!
//! Invariants:
//! - The walk is inclusive: the start directory itself is checked first.
//! - Discovery only reads directory entries; it never creates anything.

use std::path::{Path, PathBuf};

use crate::constants::{FALLBACK_ROOT_DEPTH, PROJECT_MARKERS};

/// Find the nearest directory at or above `start` containing a project marker.
///
/// Returns `None` when the filesystem root is reached without a match.
pub fn locate_project_root(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        if let Some(marker) = PROJECT_MARKERS
            .iter()
            .find(|marker| dir.join(marker).exists())
        {
            tracing::debug!(
                marker = %marker,
                dir = %dir.display(),
                "Found project marker"
            );
            return Some(dir.to_path_buf());
        }
    }
    None
}

/// Root used when no marker is found above the start directory.
///
/// Two levels above the directory of the running executable, so a binary at
/// `<root>/target/debug/<exe>` resolves to `<root>`. Falls back to `start` if
/// the executable path cannot be determined.
pub fn fallback_root(start: &Path) -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| {
            exe.parent()
                .and_then(|dir| dir.ancestors().nth(FALLBACK_ROOT_DEPTH))
                .map(Path::to_path_buf)
        })
        .unwrap_or_else(|| start.to_path_buf())
}

/// Locate the project root, using [`fallback_root`] when discovery fails.
///
/// Returns the root and whether it was found via a marker.
pub fn locate_root_or_fallback(start: &Path) -> (PathBuf, bool) {
    match locate_project_root(start) {
        Some(root) => {
            tracing::info!(root = %root.display(), "Project root detected");
            (root, true)
        }
        None => {
            let root = fallback_root(start);
            tracing::debug!(
                start = %start.display(),
                fallback = %root.display(),
                "No project marker found; using fallback root"
            );
            (root, false)
        }
    }
}
