//! Credential store backends.
//!
//! Responsibilities:
//! - Define the `CredentialStore` seam used by `SecretManager`.
//! - Provide the OS keyring backend and an in-process backend.
//!
//! Does NOT handle:
//! - Service name prefixing or `.env` fallback (see `manager`).
//!
//! Invariants:
//! - A missing entry is `Ok(None)` / `Ok(false)`, never an error.
//! - Secret values only travel as `SecretString`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use secrecy::{ExposeSecret, SecretString};

use crate::error::SecretError;

/// Storage addressed by `(service, key)`.
pub trait CredentialStore: Send + Sync {
    /// Create or overwrite an entry.
    fn set(&self, service: &str, key: &str, value: &SecretString) -> Result<(), SecretError>;

    fn get(&self, service: &str, key: &str) -> Result<Option<SecretString>, SecretError>;

    /// Remove an entry. Returns whether it existed.
    fn delete(&self, service: &str, key: &str) -> Result<bool, SecretError>;
}

/// The host operating system's credential store.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringStore;

impl CredentialStore for KeyringStore {
    fn set(&self, service: &str, key: &str, value: &SecretString) -> Result<(), SecretError> {
        let entry = keyring::Entry::new(service, key)?;
        entry.set_password(value.expose_secret())?;
        Ok(())
    }

    fn get(&self, service: &str, key: &str) -> Result<Option<SecretString>, SecretError> {
        let entry = keyring::Entry::new(service, key)?;
        match entry.get_password() {
            Ok(password) => Ok(Some(SecretString::new(password.into()))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, service: &str, key: &str) -> Result<bool, SecretError> {
        let entry = keyring::Entry::new(service, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store. Clones share the same entries.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<(String, String), SecretString>>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.len())
            .finish()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<(String, String), SecretString>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialStore for MemoryStore {
    fn set(&self, service: &str, key: &str, value: &SecretString) -> Result<(), SecretError> {
        self.entries()
            .insert((service.to_string(), key.to_string()), value.clone());
        Ok(())
    }

    fn get(&self, service: &str, key: &str) -> Result<Option<SecretString>, SecretError> {
        Ok(self
            .entries()
            .get(&(service.to_string(), key.to_string()))
            .cloned())
    }

    fn delete(&self, service: &str, key: &str) -> Result<bool, SecretError> {
        Ok(self
            .entries()
            .remove(&(service.to_string(), key.to_string()))
            .is_some())
    }
}
