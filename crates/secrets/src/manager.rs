//! Secret facade over a credential store with a `.env` fallback.
//!
//! Responsibilities:
//! - Namespace keys under a prefixed service name.
//! - Save, read, update and delete secrets, reporting failures as `bool`/`None`.
//! - Fall back to the project's `.env` file on reads.
//!
//! Does NOT handle:
//! - Writing to `.env` (it is a read-only fallback).
//!
//! Invariants:
//! - An empty service name is rejected at construction; nothing else returns an error.
//! - The credential store always wins over `.env`.
//! - Secret values and `.env` lines never appear in log output.

use std::path::PathBuf;

use chutils_config::ConfigContext;
use chutils_config::constants::DOTENV_FILE_NAME;
use secrecy::SecretString;

use crate::dotenv::DotenvFallback;
use crate::error::SecretError;
use crate::store::{CredentialStore, KeyringStore};

/// Prefix prepended to every service name unless overridden.
pub const DEFAULT_PREFIX: &str = "Chutils_";

#[derive(Debug)]
pub struct SecretManager<S: CredentialStore = KeyringStore> {
    service_name: String,
    store: S,
    dotenv: DotenvFallback,
}

impl SecretManager<KeyringStore> {
    /// Manager for `service`, stored as `Chutils_<service>` in the OS keyring.
    pub fn new(service: &str) -> Result<Self, SecretError> {
        Self::with_prefix(service, DEFAULT_PREFIX)
    }

    /// Manager for `<prefix><service>`. An empty prefix uses `service` as-is.
    pub fn with_prefix(service: &str, prefix: &str) -> Result<Self, SecretError> {
        let root = ConfigContext::global().project_root();
        Self::build(service, prefix, root.join(DOTENV_FILE_NAME))
    }

    /// Manager whose service name is the project root path of `ctx`.
    pub fn for_project(ctx: &ConfigContext) -> Result<Self, SecretError> {
        let root = ctx.project_root();
        Self::build(
            &root.display().to_string(),
            DEFAULT_PREFIX,
            root.join(DOTENV_FILE_NAME),
        )
    }

    fn build(service: &str, prefix: &str, dotenv_path: PathBuf) -> Result<Self, SecretError> {
        if service.trim().is_empty() {
            return Err(SecretError::EmptyServiceName);
        }
        let service_name = format!("{prefix}{service}");
        tracing::debug!(service = %service_name, "Secret manager initialized");
        Ok(Self {
            service_name,
            store: KeyringStore,
            dotenv: DotenvFallback::new(dotenv_path),
        })
    }
}

impl<S: CredentialStore> SecretManager<S> {
    /// Swap the credential store, keeping service name and `.env` path.
    pub fn with_store<T: CredentialStore>(self, store: T) -> SecretManager<T> {
        SecretManager {
            service_name: self.service_name,
            store,
            dotenv: self.dotenv,
        }
    }

    /// Read fallback values from `path` instead of `<project root>/.env`.
    pub fn with_dotenv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv = DotenvFallback::new(path);
        self
    }

    /// Full service name, prefix included.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn dotenv_path(&self) -> &std::path::Path {
        self.dotenv.path()
    }

    /// Store `value` under `key`, overwriting any existing value.
    pub fn save(&self, key: &str, value: &str) -> bool {
        let secret = SecretString::new(value.into());
        match self.store.set(&self.service_name, key, &secret) {
            Ok(()) => {
                tracing::debug!(service = %self.service_name, key, "Secret saved");
                true
            }
            Err(e) => {
                tracing::error!(service = %self.service_name, key, error = %e, "Failed to save secret");
                false
            }
        }
    }

    /// The secret for `key`: credential store first, then `.env`.
    pub fn get(&self, key: &str) -> Option<SecretString> {
        match self.store.get(&self.service_name, key) {
            Ok(Some(secret)) => {
                tracing::debug!(service = %self.service_name, key, "Secret read from credential store");
                return Some(secret);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(service = %self.service_name, key, error = %e, "Failed to read secret");
            }
        }

        let fallback = self.dotenv.get(key);
        if fallback.is_some() {
            tracing::debug!(key, path = %self.dotenv.path().display(), "Secret read from .env");
        } else {
            tracing::debug!(service = %self.service_name, key, "Secret not found");
        }
        fallback
    }

    /// Remove `key` from the credential store. A missing key counts as success.
    pub fn delete(&self, key: &str) -> bool {
        match self.store.delete(&self.service_name, key) {
            Ok(true) => {
                tracing::debug!(service = %self.service_name, key, "Secret deleted");
                true
            }
            Ok(false) => {
                tracing::debug!(service = %self.service_name, key, "Secret not found, nothing to delete");
                true
            }
            Err(e) => {
                tracing::error!(service = %self.service_name, key, error = %e, "Failed to delete secret");
                false
            }
        }
    }

    /// Same as [`save`](Self::save).
    pub fn update(&self, key: &str, value: &str) -> bool {
        tracing::debug!(service = %self.service_name, key, "Updating secret");
        self.save(key, value)
    }
}
