//! Typed accessors over a merged `Config`.
//!
//! Responsibilities:
//! - Look up raw values by section and (optionally dotted) key.
//! - Convert values to integers, floats, booleans, strings and lists.
//! - Fall back to caller-supplied defaults on absence or conversion failure.
//!
//! Does NOT handle:
//! - Loading or caching (see `loader`).
//!
//! Invariants:
//! - Accessors never panic and never return errors.
//! - A failed conversion logs exactly one warning naming the section, key,
//!   raw value and expected type.
//! - Native YAML values of the requested type are returned as-is; strings are
//!   parsed.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde_yaml::{Mapping, Value};

use crate::types::{Config, ConfigFormat};

impl Config {
    /// A section's mapping, if the section exists and is a mapping.
    pub fn section(&self, name: &str) -> Option<&Mapping> {
        self.data.get(name)?.as_mapping()
    }

    /// Raw lookup of `key` inside `section`.
    ///
    /// `key` may be a dotted path into nested mappings (`settings.debug`). A key
    /// that literally contains dots is matched before the path is traversed.
    pub fn value(&self, section: &str, key: &str) -> Option<&Value> {
        let section = self.section(section)?;
        let key: Cow<'_, str> = match self.format {
            Some(ConfigFormat::Ini) => Cow::Owned(key.to_ascii_lowercase()),
            _ => Cow::Borrowed(key),
        };
        if let Some(value) = section.get(key.as_ref()) {
            return Some(value);
        }
        lookup_dotted(section, &key)
    }

    /// The raw value, or `fallback` when the key is absent. No conversion.
    pub fn get_value(&self, section: &str, key: &str, fallback: impl Into<Value>) -> Value {
        self.value(section, key)
            .cloned()
            .unwrap_or_else(|| fallback.into())
    }

    /// The value rendered as a string; non-scalar values fall back.
    pub fn get_string(&self, section: &str, key: &str, fallback: &str) -> String {
        self.convert(section, key, "string", scalar_to_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn get_int(&self, section: &str, key: &str, fallback: i64) -> i64 {
        self.convert(section, key, "integer", |value| match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .unwrap_or(fallback)
    }

    pub fn get_float(&self, section: &str, key: &str, fallback: f64) -> f64 {
        self.convert(section, key, "float", |value| match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .unwrap_or(fallback)
    }

    /// Booleans accept `1/yes/true/on` and `0/no/false/off`, case-insensitively.
    pub fn get_boolean(&self, section: &str, key: &str, fallback: bool) -> bool {
        self.convert(section, key, "boolean", |value| match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            Value::String(s) => parse_bool(s),
            _ => None,
        })
        .unwrap_or(fallback)
    }

    /// A list of strings.
    ///
    /// Sequences are returned item by item; a string is split into trimmed,
    /// non-empty lines.
    pub fn get_list(&self, section: &str, key: &str, fallback: Vec<String>) -> Vec<String> {
        self.convert(section, key, "list", |value| match value {
            Value::Sequence(items) => Some(items.iter().filter_map(scalar_to_string).collect()),
            Value::String(s) => Some(
                s.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            other => scalar_to_string(other).map(|s| vec![s]),
        })
        .unwrap_or(fallback)
    }

    /// A copy of the section, or an empty mapping (with a warning) if absent.
    pub fn get_section(&self, name: &str) -> Mapping {
        self.get_section_or(name, Mapping::new())
    }

    /// A copy of the section, or `fallback` (with a warning) if absent.
    pub fn get_section_or(&self, name: &str, fallback: Mapping) -> Mapping {
        match self.section(name) {
            Some(section) => section.clone(),
            None => {
                tracing::warn!(section = name, "Config section not found; using fallback");
                fallback
            }
        }
    }

    /// Values for several keys of one section.
    ///
    /// Missing keys map to `None`. An absent section yields an empty map.
    pub fn get_multiple(&self, section: &str, keys: &[&str]) -> BTreeMap<String, Option<Value>> {
        if !self.has_section(section) {
            return BTreeMap::new();
        }
        keys.iter()
            .map(|key| (key.to_string(), self.value(section, key).cloned()))
            .collect()
    }

    fn convert<T>(
        &self,
        section: &str,
        key: &str,
        expected: &str,
        f: impl FnOnce(&Value) -> Option<T>,
    ) -> Option<T> {
        let raw = self.value(section, key)?;
        let converted = f(raw);
        if converted.is_none() {
            tracing::warn!(
                section,
                key,
                value = %display_value(raw),
                expected,
                "Config value could not be converted; using fallback"
            );
        }
        converted
    }
}

fn lookup_dotted<'a>(mapping: &'a Mapping, path: &str) -> Option<&'a Value> {
    if !path.contains('.') {
        return None;
    }
    let mut parts = path.split('.');
    let mut current = mapping.get(parts.next()?)?;
    for part in parts {
        current = current.as_mapping()?.get(part)?;
    }
    Some(current)
}

/// Render a scalar as text; `None` for mappings, sequences and null.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn display_value(value: &Value) -> String {
    scalar_to_string(value).unwrap_or_else(|| match value {
        Value::Null => "null".to_string(),
        other => format!("{other:?}"),
    })
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}
