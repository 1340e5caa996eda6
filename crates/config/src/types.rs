//! Core data model for merged configuration.
//!
//! Responsibilities:
//! - Define the file formats the engine understands (`ConfigFormat`).
//! - Describe resolved file locations (`ConfigPaths`).
//! - Hold the merged, ordered section mapping (`Config`).
//!
//! Does NOT handle:
//! - Reading values with type conversion (see `accessors.rs`).
//! - Parsing or merging files (see `loader`).
//!
//! Invariants:
//! - YAML-sourced values keep their native scalar types.
//! - INI-sourced values are strings, or sequences of strings for multi-line values.
//! - INI-sourced keys are lower-cased; section names keep their case.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::constants::LOCAL_OVERRIDE_INFIX;

/// On-disk format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    Yaml,
    Ini,
}

impl ConfigFormat {
    /// Determine the format from a path's extension.
    ///
    /// `.yml` and `.yaml` are YAML; everything else is treated as INI.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yml") | Some("yaml") => Self::Yaml,
            _ => Self::Ini,
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => f.write_str("yaml"),
            Self::Ini => f.write_str("ini"),
        }
    }
}

/// Resolved locations of the primary config file and its local override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPaths {
    /// The primary config file, if one was found.
    pub primary: Option<PathBuf>,
    /// The `<stem>.local.<ext>` override beside the primary, if it exists.
    pub local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Build paths for an explicitly chosen primary file.
    ///
    /// The local override is only recorded when it exists on disk.
    pub fn for_file(primary: impl Into<PathBuf>) -> Self {
        let primary = primary.into();
        let local = local_override_path(&primary).filter(|p| p.is_file());
        Self {
            primary: Some(primary),
            local,
        }
    }

    /// Format of the primary file, if any.
    pub fn format(&self) -> Option<ConfigFormat> {
        self.primary.as_deref().map(ConfigFormat::from_path)
    }
}

/// Compute `<stem>.local.<ext>` for a config file path.
///
/// Returns `None` for paths without a file stem.
pub fn local_override_path(primary: &Path) -> Option<PathBuf> {
    let stem = primary.file_stem()?.to_str()?;
    let name = match primary.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}.{LOCAL_OVERRIDE_INFIX}.{ext}"),
        None => format!("{stem}.{LOCAL_OVERRIDE_INFIX}"),
    };
    Some(primary.with_file_name(name))
}

/// Merged configuration: section name to nested mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub(crate) format: Option<ConfigFormat>,
    pub(crate) data: Mapping,
}

impl Config {
    /// An empty configuration (no file, or a file that failed to parse).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an already-parsed mapping.
    pub fn from_mapping(format: Option<ConfigFormat>, data: Mapping) -> Self {
        Self { format, data }
    }

    /// Format of the primary source, or `None` for an empty configuration.
    pub fn format(&self) -> Option<ConfigFormat> {
        self.format
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The underlying ordered mapping.
    pub fn as_mapping(&self) -> &Mapping {
        &self.data
    }

    /// Names of all top-level sections, in file order.
    pub fn section_names(&self) -> Vec<String> {
        self.data
            .iter()
            .filter(|(_, v)| v.is_mapping())
            .filter_map(|(k, _)| k.as_str().map(str::to_string))
            .collect()
    }

    /// Whether a section exists and is a mapping.
    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Render the merged configuration as YAML text.
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&Value::Mapping(self.data.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("/p/config.yml")),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("/p/config.YAML")),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("/p/config.ini")),
            ConfigFormat::Ini
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("/p/settings")),
            ConfigFormat::Ini
        );
    }

    #[test]
    fn test_local_override_path_keeps_extension() {
        assert_eq!(
            local_override_path(Path::new("/p/config.yml")),
            Some(PathBuf::from("/p/config.local.yml"))
        );
        assert_eq!(
            local_override_path(Path::new("/p/config.ini")),
            Some(PathBuf::from("/p/config.local.ini"))
        );
    }

    #[test]
    fn test_for_file_skips_missing_local() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("config.yml");
        std::fs::write(&primary, "A: {}\n").unwrap();

        let paths = ConfigPaths::for_file(&primary);
        assert_eq!(paths.primary.as_deref(), Some(primary.as_path()));
        assert!(paths.local.is_none());
        assert_eq!(paths.format(), Some(ConfigFormat::Yaml));

        std::fs::write(dir.path().join("config.local.yml"), "A: {}\n").unwrap();
        let paths = ConfigPaths::for_file(&primary);
        assert_eq!(paths.local, Some(dir.path().join("config.local.yml")));
    }

    #[test]
    fn test_section_names_skip_scalars() {
        let config: Config = Config::from_mapping(
            Some(ConfigFormat::Yaml),
            serde_yaml::from_str("A: {x: 1}\nversion: 3\nB: {}\n").unwrap(),
        );
        assert_eq!(config.section_names(), vec!["A", "B"]);
        assert!(config.has_section("A"));
        assert!(!config.has_section("version"));
    }

    #[test]
    fn test_to_yaml_string_keeps_order() {
        let config = Config::from_mapping(
            Some(ConfigFormat::Ini),
            serde_yaml::from_str("B: {y: '2'}\nA: {x: [a, b]}\n").unwrap(),
        );
        let text = config.to_yaml_string().unwrap();
        assert!(text.starts_with("B:\n"), "got: {text}");
        let reparsed: Mapping = serde_yaml::from_str(&text).unwrap();
        assert_eq!(&reparsed, config.as_mapping());
    }
}
