//! Reading a single config file into a mapping.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use super::error::ConfigError;
use super::ini::parse_ini;
use crate::types::ConfigFormat;

/// Read and parse one config file according to its format.
///
/// An empty YAML document is an empty mapping, not an error.
pub(crate) fn read_config_file(path: &Path, format: ConfigFormat) -> Result<Mapping, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    match format {
        ConfigFormat::Yaml => parse_yaml(&content, path),
        ConfigFormat::Ini => parse_ini(&content).map_err(|e| ConfigError::IniParse {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn parse_yaml(content: &str, path: &Path) -> Result<Mapping, ConfigError> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::YamlParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}
