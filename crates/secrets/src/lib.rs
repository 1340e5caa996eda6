//! Secret storage backed by the OS credential store, with a `.env` fallback.
//!
//! ```no_run
//! use chutils_secrets::SecretManager;
//! use secrecy::ExposeSecret;
//!
//! let secrets = SecretManager::new("my_app")?;
//! secrets.save("db_password", "hunter2");
//! if let Some(password) = secrets.get("db_password") {
//!     assert_eq!(password.expose_secret(), "hunter2");
//! }
//! # Ok::<(), chutils_secrets::SecretError>(())
//! ```

mod dotenv;
mod error;
mod manager;
mod store;

pub use dotenv::DotenvFallback;
pub use error::SecretError;
pub use manager::{DEFAULT_PREFIX, SecretManager};
pub use store::{CredentialStore, KeyringStore, MemoryStore};
