//! Read-only `.env` fallback for secret lookups.
//!
//! Responsibilities:
//! - Parse a flat `KEY=value` file once and serve lookups from memory.
//! - Honor `DOTENV_DISABLED`.
//!
//! Does NOT handle:
//! - Writing `.env` files.
//! - Exporting values into the process environment.
//!
//! Invariants:
//! - The file is read at most once per `DotenvFallback`.
//! - Parse errors are logged by line number only, never with line contents.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chutils_config::dotenv_disabled;
use secrecy::SecretString;

use crate::error::SecretError;

pub struct DotenvFallback {
    path: PathBuf,
    values: OnceLock<HashMap<String, SecretString>>,
}

impl std::fmt::Debug for DotenvFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DotenvFallback")
            .field("path", &self.path)
            .field("loaded", &self.values.get().map(HashMap::len))
            .finish()
    }
}

impl DotenvFallback {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value for `key`, loading the file on first use.
    pub fn get(&self, key: &str) -> Option<SecretString> {
        if dotenv_disabled() {
            return None;
        }
        self.values
            .get_or_init(|| match read_dotenv(&self.path) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unreadable .env file");
                    HashMap::new()
                }
            })
            .get(key)
            .cloned()
    }
}

/// Parse `path` without touching the process environment.
///
/// A missing file yields an empty map. Parsing stops at the first malformed line.
fn read_dotenv(path: &Path) -> Result<HashMap<String, SecretString>, SecretError> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), ".env file not found");
        return Ok(HashMap::new());
    }

    let iter = dotenvy::from_path_iter(path).map_err(|e| SecretError::Dotenv {
        path: path.to_path_buf(),
        message: redact(&e),
    })?;

    let mut values = HashMap::new();
    for item in iter {
        match item {
            Ok((key, value)) => {
                values.insert(key, SecretString::new(value.into()));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %redact(&e), "Stopped reading .env file at malformed line");
                break;
            }
        }
    }
    tracing::debug!(path = %path.display(), count = values.len(), "Loaded .env fallback");
    Ok(values)
}

fn redact(error: &dotenvy::Error) -> String {
    match error {
        dotenvy::Error::LineParse(_, index) => format!("parse error at position {index}"),
        dotenvy::Error::Io(e) => e.kind().to_string(),
        _ => "invalid .env file".to_string(),
    }
}
