//! Tests for `ConfigContext` discovery, loading and caching.
//!
//! Responsibilities:
//! - Test root/path resolution precedence (builder > env > discovery).
//! - Test primary + local merge through the context.
//! - Test cache behavior across `get_config`, `load_config`, `reset` and `save_value`.
//! - Test degradation on missing or malformed files.
//!
//! Invariants:
//! - Tests that read environment variables use `serial_test`.
//! - Temporary directories are cleaned up automatically via `tempfile`.

mod context_tests;
mod discovery_tests;
