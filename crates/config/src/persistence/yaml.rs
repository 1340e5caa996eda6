//! Single-value update of a YAML document.
//!
//! The document is parsed, one entry is set and the whole document is
//! serialized again. Key order is preserved; comments are not.

use serde_yaml::{Mapping, Value};

use super::error::SaveError;

/// Set `section.key` to `value` in the YAML `text`, creating the section if needed.
pub fn update_yaml(text: &str, section: &str, key: &str, value: &Value) -> Result<String, SaveError> {
    let mut root = match serde_yaml::from_str::<Value>(text).map_err(SaveError::YamlParse)? {
        Value::Mapping(mapping) => mapping,
        Value::Null => Mapping::new(),
        _ => return Err(SaveError::NotAMapping),
    };

    if !root.contains_key(section) {
        root.insert(Value::from(section), Value::Mapping(Mapping::new()));
    }
    let Some(Value::Mapping(entries)) = root.get_mut(section) else {
        return Err(SaveError::SectionNotAMapping {
            section: section.to_string(),
        });
    };
    entries.insert(Value::from(key), value.clone());

    serde_yaml::to_string(&Value::Mapping(root)).map_err(SaveError::YamlSerialize)
}
