//! Owned configuration context: discovery, loading and caching.
//!
//! Responsibilities:
//! - Resolve and cache the project root and config file paths.
//! - Load primary + local files, deep-merge them, and cache the result.
//! - Provide an explicit `reset()` for test isolation and forced reloads.
//! - Provide the process-default instance behind the crate's free functions.
//!
//! Does NOT handle:
//! - INI/YAML syntax (see `ini.rs` and `file.rs`).
//! - Writing files (see `persistence`); writes never touch the cache.
//!
//! Invariants:
//! - Builder overrides take precedence over environment variables, which take
//!   precedence over filesystem discovery.
//! - Missing or malformed files never fail a load; an empty `Config` is used.
//! - The cached `Config` is shared via `Arc` and is never mutated in place.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use serde_yaml::Value;

use super::env::{config_path_override as env_config_path, project_root_override as env_project_root};
use super::file::read_config_file;
use super::merge::deep_merge;
use crate::paths::resolve_config_paths;
use crate::root::locate_root_or_fallback;
use crate::types::{Config, ConfigFormat, ConfigPaths};

#[derive(Debug, Default)]
struct ContextState {
    root: Option<PathBuf>,
    paths: Option<ConfigPaths>,
    cached: Option<Arc<Config>>,
}

/// Handle owning discovery results and the merged configuration cache.
///
/// Independent instances do not share state, so tests and embedders can hold
/// their own. [`ConfigContext::global`] is the instance used by the crate-level
/// convenience functions.
#[derive(Debug, Default)]
pub struct ConfigContext {
    start_dir: Option<PathBuf>,
    root_override: Option<PathBuf>,
    config_path_override: Option<PathBuf>,
    state: Mutex<ContextState>,
}

impl ConfigContext {
    /// Create a context that starts discovery from the current working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-default context.
    pub fn global() -> &'static ConfigContext {
        static GLOBAL: OnceLock<ConfigContext> = OnceLock::new();
        GLOBAL.get_or_init(ConfigContext::new)
    }

    /// Start the upward marker walk from `dir` instead of the working directory.
    pub fn with_start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    /// Use `root` as the project root without walking the filesystem.
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root_override = Some(root.into());
        self
    }

    /// Use `path` as the primary config file instead of discovering one.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path_override = Some(path.into());
        self
    }

    fn state(&self) -> MutexGuard<'_, ContextState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_dir(&self) -> PathBuf {
        self.start_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn resolve_root(&self) -> PathBuf {
        if let Some(root) = self.root_override.clone().or_else(env_project_root) {
            tracing::debug!(root = %root.display(), "Using configured project root");
            return root;
        }
        locate_root_or_fallback(&self.start_dir()).0
    }

    fn root_locked(&self, state: &mut ContextState) -> PathBuf {
        if let Some(root) = &state.root {
            return root.clone();
        }
        let root = self.resolve_root();
        state.root = Some(root.clone());
        root
    }

    fn paths_locked(&self, state: &mut ContextState) -> ConfigPaths {
        if let Some(paths) = &state.paths {
            return paths.clone();
        }
        let paths = match self.config_path_override.clone().or_else(env_config_path) {
            Some(path) => ConfigPaths::for_file(path),
            None => {
                let root = self.root_locked(state);
                resolve_config_paths(&root)
            }
        };
        state.paths = Some(paths.clone());
        paths
    }

    /// The project root, discovered once and cached.
    pub fn project_root(&self) -> PathBuf {
        let mut state = self.state();
        self.root_locked(&mut state)
    }

    /// The resolved primary/local config files, cached after first use.
    pub fn config_paths(&self) -> ConfigPaths {
        let mut state = self.state();
        self.paths_locked(&mut state)
    }

    /// The merged configuration, loading it on first use.
    pub fn get_config(&self) -> Arc<Config> {
        let mut state = self.state();
        if let Some(config) = &state.cached {
            return Arc::clone(config);
        }
        let paths = self.paths_locked(&mut state);
        let config = Arc::new(build_config(&paths));
        state.cached = Some(Arc::clone(&config));
        config
    }

    /// Reload from disk, bypassing and then replacing the cache.
    ///
    /// Paths stay cached; call [`reset`](Self::reset) to rediscover them.
    pub fn load_config(&self) -> Arc<Config> {
        let mut state = self.state();
        let paths = self.paths_locked(&mut state);
        let config = Arc::new(build_config(&paths));
        state.cached = Some(Arc::clone(&config));
        config
    }

    /// Forget the cached root, paths and configuration.
    pub fn reset(&self) {
        *self.state() = ContextState::default();
    }

    /// Write one value into the primary config file.
    ///
    /// The cached configuration is left as-is; call [`load_config`](Self::load_config)
    /// to observe the change through the accessors.
    pub fn save_value(&self, section: &str, key: &str, value: impl Into<Value>) -> bool {
        match self.config_paths().primary {
            Some(path) => crate::persistence::save_value(&path, section, key, &value.into()),
            None => {
                tracing::warn!(
                    section,
                    key,
                    "Cannot save value: no primary config file was found"
                );
                false
            }
        }
    }

    pub fn get_value(&self, section: &str, key: &str, fallback: impl Into<Value>) -> Value {
        self.get_config().get_value(section, key, fallback)
    }

    pub fn get_string(&self, section: &str, key: &str, fallback: &str) -> String {
        self.get_config().get_string(section, key, fallback)
    }

    pub fn get_int(&self, section: &str, key: &str, fallback: i64) -> i64 {
        self.get_config().get_int(section, key, fallback)
    }

    pub fn get_float(&self, section: &str, key: &str, fallback: f64) -> f64 {
        self.get_config().get_float(section, key, fallback)
    }

    pub fn get_boolean(&self, section: &str, key: &str, fallback: bool) -> bool {
        self.get_config().get_boolean(section, key, fallback)
    }

    pub fn get_list(&self, section: &str, key: &str, fallback: Vec<String>) -> Vec<String> {
        self.get_config().get_list(section, key, fallback)
    }

    pub fn get_section(&self, name: &str) -> serde_yaml::Mapping {
        self.get_config().get_section(name)
    }

    pub fn get_multiple(
        &self,
        section: &str,
        keys: &[&str],
    ) -> std::collections::BTreeMap<String, Option<Value>> {
        self.get_config().get_multiple(section, keys)
    }
}

/// Load and merge the files described by `paths`.
fn build_config(paths: &ConfigPaths) -> Config {
    let Some(primary) = paths.primary.as_deref() else {
        tracing::debug!("No primary config file; using empty configuration");
        return Config::empty();
    };
    if !primary.is_file() {
        tracing::info!(
            path = %primary.display(),
            "Config file does not exist; using empty configuration"
        );
        return Config::empty();
    }

    let format = ConfigFormat::from_path(primary);
    let mut data = match read_config_file(primary, format) {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load config file, using defaults");
            return Config::empty();
        }
    };

    if let Some(local) = paths.local.as_deref() {
        merge_local(&mut data, local, format);
    }

    tracing::info!(path = %primary.display(), %format, "Configuration loaded");
    Config::from_mapping(Some(format), data)
}

fn merge_local(data: &mut serde_yaml::Mapping, local: &Path, format: ConfigFormat) {
    match read_config_file(local, format) {
        Ok(overlay) => {
            deep_merge(data, overlay);
            tracing::debug!(path = %local.display(), "Applied local config override");
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to load local config override; ignoring it"
            );
        }
    }
}
