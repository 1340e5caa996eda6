//! INI parsing into the shared mapping model.
//!
//! Responsibilities:
//! - Parse `[Section]` headers and `key = value` / `key: value` lines.
//! - Collect indented continuation lines into list values.
//!
//! Does NOT handle:
//! - Writing INI files (see `persistence::ini`).
//! - Type conversion of values (see `accessors.rs`).
//!
//! Invariants:
//! - Keys are lower-cased; section names keep their case.
//! - Single-line values become strings; values with continuation lines become
//!   a sequence of their trimmed, non-empty lines.
//! - Full-line comments start with `#` or `;`; there are no inline comments.
//! - Blank lines inside a multi-line value are dropped; the value ends at the
//!   next non-blank line that is not indented.

use serde_yaml::{Mapping, Value};

use super::error::IniError;

struct PendingKey {
    key: String,
    lines: Vec<String>,
    continued: bool,
}

impl PendingKey {
    fn into_value(self) -> Value {
        if self.continued {
            Value::Sequence(
                self.lines
                    .into_iter()
                    .filter(|l| !l.is_empty())
                    .map(Value::String)
                    .collect(),
            )
        } else {
            Value::String(self.lines.into_iter().next().unwrap_or_default())
        }
    }
}

struct PendingSection {
    name: String,
    entries: Mapping,
}

/// Parse INI text into a section mapping.
pub fn parse_ini(text: &str) -> Result<Mapping, IniError> {
    let mut sections: Vec<PendingSection> = Vec::new();
    let mut current_key: Option<PendingKey> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw_line.trim();

        if trimmed.is_empty() {
            if let Some(pending) = current_key.as_mut() {
                pending.lines.push(String::new());
            }
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        let indented = raw_line.starts_with(|c: char| c.is_whitespace());
        if indented && let Some(pending) = current_key.as_mut() {
            pending.lines.push(trimmed.to_string());
            pending.continued = true;
            continue;
        }

        if trimmed.starts_with('[') {
            flush_key(&mut sections, &mut current_key, line_no)?;
            let name = parse_header(trimmed).ok_or(IniError::MalformedHeader { line: line_no })?;
            if sections.iter().any(|s| s.name == name) {
                return Err(IniError::DuplicateSection {
                    line: line_no,
                    section: name,
                });
            }
            sections.push(PendingSection {
                name,
                entries: Mapping::new(),
            });
            continue;
        }

        flush_key(&mut sections, &mut current_key, line_no)?;
        if sections.is_empty() {
            return Err(IniError::MissingSectionHeader { line: line_no });
        }
        let (key, value) =
            split_key_value(trimmed).ok_or(IniError::MalformedLine { line: line_no })?;
        let mut lines = Vec::new();
        if !value.is_empty() || !indented {
            lines.push(value.to_string());
        }
        current_key = Some(PendingKey {
            key: key.to_ascii_lowercase(),
            lines,
            continued: false,
        });
    }

    let end = text.lines().count() + 1;
    flush_key(&mut sections, &mut current_key, end)?;

    let mut mapping = Mapping::new();
    for section in sections {
        mapping.insert(
            Value::String(section.name),
            Value::Mapping(section.entries),
        );
    }
    Ok(mapping)
}

fn flush_key(
    sections: &mut [PendingSection],
    current_key: &mut Option<PendingKey>,
    line_no: usize,
) -> Result<(), IniError> {
    let Some(pending) = current_key.take() else {
        return Ok(());
    };
    let Some(section) = sections.last_mut() else {
        return Err(IniError::MissingSectionHeader { line: line_no });
    };
    let key = Value::String(pending.key.clone());
    if section.entries.contains_key(&key) {
        return Err(IniError::DuplicateKey {
            line: line_no,
            section: section.name.clone(),
            key: pending.key,
        });
    }
    section.entries.insert(key, pending.into_value());
    Ok(())
}

/// Extract the section name from a trimmed `[Name]` line.
pub(crate) fn parse_header(trimmed: &str) -> Option<String> {
    let inner = trimmed.strip_prefix('[')?;
    let end = inner.find(']')?;
    let name = inner[..end].trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Split a trimmed line at the first `=` or `:` delimiter.
pub(crate) fn split_key_value(trimmed: &str) -> Option<(&str, &str)> {
    let pos = trimmed.find(['=', ':'])?;
    let key = trimmed[..pos].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, trimmed[pos + 1..].trim()))
}
