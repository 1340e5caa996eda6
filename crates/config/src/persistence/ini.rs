//! Comment-preserving single-value rewrite of INI text.
//!
//! Responsibilities:
//! - Locate `[section]` / `key` case-insensitively and rewrite that entry only.
//! - Insert a missing key right after the section header.
//! - Append a missing section at the end of the text.
//!
//! Does NOT handle:
//! - File I/O (see `persistence::save_value`).
//!
//! Invariants:
//! - Every line other than the rewritten entry is emitted byte-for-byte,
//!   including its original line terminator.
//! - The rewritten line keeps the key's original casing.
//! - Continuation lines belonging to the old value are replaced with those of
//!   the new value, including those after a blank line. Comment lines inside
//!   the old value are kept.

use serde_yaml::Value;

use super::error::SaveError;
use crate::accessors::scalar_to_string;
use crate::loader::{parse_header, split_key_value};

/// Indentation used for continuation lines of list values.
const CONTINUATION_INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Before the first section header, or after the target was handled.
    Outside,
    /// Inside the target section; key not yet found.
    InTarget,
    /// The key line was just rewritten; dropping its old continuation lines.
    Replacing,
    /// Inside a section other than the target.
    InOther,
}

struct Line<'a> {
    content: &'a str,
    terminator: &'a str,
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    text.split_inclusive('\n')
        .map(|raw| {
            let content = raw
                .strip_suffix("\r\n")
                .or_else(|| raw.strip_suffix('\n'))
                .unwrap_or(raw);
            Line {
                content,
                terminator: &raw[content.len()..],
            }
        })
        .collect()
}

fn is_indented(content: &str) -> bool {
    content.starts_with(|c: char| c.is_whitespace())
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('#') || trimmed.starts_with(';')
}

fn raw(line: &Line<'_>) -> String {
    format!("{}{}", line.content, line.terminator)
}

/// Render `key = value` plus continuation lines, without terminators.
fn render_entry(section: &str, key: &str, value: &Value) -> Result<Vec<String>, SaveError> {
    let unsupported = || SaveError::UnsupportedIniValue {
        section: section.to_string(),
        key: key.to_string(),
    };

    match value {
        Value::Null => Ok(vec![format!("{key} =")]),
        Value::Sequence(items) => {
            let mut lines = vec![format!("{key} =")];
            for item in items {
                let item = scalar_to_string(item).ok_or_else(unsupported)?;
                lines.push(format!("{CONTINUATION_INDENT}{item}"));
            }
            Ok(lines)
        }
        Value::Mapping(_) | Value::Tagged(_) => Err(unsupported()),
        scalar => {
            let text = scalar_to_string(scalar).ok_or_else(unsupported)?;
            let mut parts = text.lines();
            let first = parts.next().unwrap_or_default();
            let mut lines = vec![format!("{key} = {first}")];
            lines.extend(
                parts
                    .filter(|p| !p.trim().is_empty())
                    .map(|p| format!("{CONTINUATION_INDENT}{}", p.trim())),
            );
            Ok(lines)
        }
    }
}

/// Rewrite `section.key` in `text` to `value`.
///
/// The key is appended after the section header when missing, and the section
/// is appended at the end when missing.
pub fn update_ini(text: &str, section: &str, key: &str, value: &Value) -> Result<String, SaveError> {
    let lines = split_lines(text);
    let newline = lines
        .iter()
        .map(|l| l.terminator)
        .find(|t| !t.is_empty())
        .unwrap_or("\n");

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + 2);
    let mut state = ScanState::Outside;
    let mut header_index: Option<usize> = None;
    let mut written = false;
    let mut in_value = false;
    // Blank and comment lines seen while replacing, until it is known whether
    // the old value continues past them.
    let mut held: Vec<&Line<'_>> = Vec::new();

    for line in &lines {
        let trimmed = line.content.trim();
        let indented = is_indented(line.content);

        if state == ScanState::Replacing {
            if trimmed.is_empty() || is_comment(trimmed) {
                held.push(line);
                continue;
            }
            if indented {
                out.extend(
                    held.drain(..)
                        .filter(|l| !l.content.trim().is_empty())
                        .map(raw),
                );
                continue;
            }
            out.extend(held.drain(..).map(raw));
            state = ScanState::Outside;
        }

        if trimmed.starts_with('[')
            && let Some(name) = parse_header(trimmed)
        {
            in_value = false;
            state = if !written && header_index.is_none() && name.eq_ignore_ascii_case(section) {
                header_index = Some(out.len());
                ScanState::InTarget
            } else if state == ScanState::InTarget {
                ScanState::Outside
            } else {
                ScanState::InOther
            };
            out.push(raw(line));
            continue;
        }

        if !trimmed.is_empty() && !is_comment(trimmed) && !(indented && in_value) {
            let parsed = split_key_value(trimmed);
            in_value = parsed.is_some();

            if state == ScanState::InTarget
                && let Some((found, _)) = parsed
                && found.eq_ignore_ascii_case(key)
            {
                let terminator = if line.terminator.is_empty() {
                    newline
                } else {
                    line.terminator
                };
                for rendered in render_entry(section, found, value)? {
                    out.push(format!("{rendered}{terminator}"));
                }
                if line.terminator.is_empty()
                    && let Some(last) = out.last_mut()
                {
                    last.truncate(last.len() - terminator.len());
                }
                written = true;
                state = ScanState::Replacing;
                continue;
            }
        }

        out.push(raw(line));
    }
    out.extend(held.drain(..).map(raw));

    if written {
        tracing::debug!(section, key, "Rewrote existing INI entry");
        return Ok(out.concat());
    }

    let entry = render_entry(section, key, value)?;
    match header_index {
        Some(idx) => {
            if !out[idx].ends_with('\n') {
                out[idx].push_str(newline);
            }
            let inserted = entry.into_iter().map(|l| format!("{l}{newline}"));
            out.splice(idx + 1..idx + 1, inserted);
            tracing::debug!(section, key, "Inserted missing key after section header");
        }
        None => {
            if let Some(last) = out.last_mut() {
                if !last.ends_with('\n') {
                    last.push_str(newline);
                }
                if !last.trim().is_empty() {
                    out.push(newline.to_string());
                }
            }
            out.push(format!("[{section}]{newline}"));
            out.extend(entry.into_iter().map(|l| format!("{l}{newline}")));
            tracing::debug!(section, key, "Appended missing section");
        }
    }
    Ok(out.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_ini;

    const SAMPLE: &str = "\
; top comment
[Database]
Host = localhost
# port comment
port = 5432

[User]
name = Admin
roles =
    admin
    editor

[Other]
host = elsewhere
";

    #[test]
    fn test_rewrites_only_target_line_and_keeps_key_casing() {
        let updated = update_ini(SAMPLE, "Database", "host", &Value::from("db.internal")).unwrap();

        let expected = SAMPLE.replace("Host = localhost", "Host = db.internal");
        assert_eq!(updated, expected);
    }

    #[test]
    fn test_section_match_is_case_insensitive() {
        let updated = update_ini(SAMPLE, "database", "PORT", &Value::from(6543)).unwrap();
        assert!(updated.contains("port = 6543\n"));
        assert!(updated.contains("# port comment\n"));
    }

    #[test]
    fn test_same_key_in_other_section_untouched() {
        let updated = update_ini(SAMPLE, "Other", "host", &Value::from("x")).unwrap();
        assert!(updated.contains("Host = localhost\n"));
        assert!(updated.ends_with("host = x\n"));
    }

    #[test]
    fn test_list_value_replaces_continuation_lines() {
        let roles = Value::Sequence(vec![Value::from("viewer")]);
        let updated = update_ini(SAMPLE, "User", "roles", &roles).unwrap();

        assert!(updated.contains("roles =\n    viewer\n\n[Other]"));
        assert!(!updated.contains("editor"));

        let parsed = parse_ini(&updated).unwrap();
        let user = parsed.get("User").and_then(Value::as_mapping).unwrap();
        assert_eq!(
            user.get("roles"),
            Some(&Value::Sequence(vec![Value::from("viewer")]))
        );
    }

    #[test]
    fn test_scalar_replacing_list_drops_old_items() {
        let updated = update_ini(SAMPLE, "User", "roles", &Value::from("admin")).unwrap();
        assert!(updated.contains("roles = admin\n\n[Other]"));
    }

    #[test]
    fn test_missing_key_inserted_after_header() {
        let updated = update_ini(SAMPLE, "Database", "user", &Value::from("root")).unwrap();
        assert!(updated.contains("[Database]\nuser = root\nHost = localhost\n"));
    }

    #[test]
    fn test_missing_section_appended_at_end() {
        let updated = update_ini(SAMPLE, "Cache", "ttl", &Value::from(30)).unwrap();
        assert!(updated.starts_with(SAMPLE));
        assert!(updated.ends_with("host = elsewhere\n\n[Cache]\nttl = 30\n"));
    }

    #[test]
    fn test_missing_section_in_empty_text() {
        let updated = update_ini("", "Cache", "ttl", &Value::from("30")).unwrap();
        assert_eq!(updated, "[Cache]\nttl = 30\n");
    }

    #[test]
    fn test_crlf_terminators_preserved() {
        let text = "[A]\r\nkey = old\r\nother = 1\r\n";
        let updated = update_ini(text, "A", "key", &Value::from("new")).unwrap();
        assert_eq!(updated, "[A]\r\nkey = new\r\nother = 1\r\n");
    }

    #[test]
    fn test_last_line_without_terminator() {
        let text = "[A]\nkey = old";
        let updated = update_ini(text, "A", "key", &Value::from("new")).unwrap();
        assert_eq!(updated, "[A]\nkey = new");
    }

    #[test]
    fn test_colon_delimiter_rewritten() {
        let text = "[A]\nKey: old\n";
        let updated = update_ini(text, "A", "key", &Value::from(true)).unwrap();
        assert_eq!(updated, "[A]\nKey = true\n");
    }

    #[test]
    fn test_commented_key_not_matched() {
        let text = "[A]\n# key = commented\nkey = real\n";
        let updated = update_ini(text, "A", "key", &Value::from("new")).unwrap();
        assert_eq!(updated, "[A]\n# key = commented\nkey = new\n");
    }

    #[test]
    fn test_continuation_line_with_delimiter_not_matched() {
        let text = "[A]\nurls =\n    key=1\nkey = real\n";
        let updated = update_ini(text, "A", "key", &Value::from("new")).unwrap();
        assert_eq!(updated, "[A]\nurls =\n    key=1\nkey = new\n");
    }

    #[test]
    fn test_list_with_blank_line_fully_replaced() {
        let text = "[User]\nroles =\n    admin\n\n    editor\n    viewer\n\n[Other]\nx = 1\n";
        let roles = Value::Sequence(vec![Value::from("guest")]);
        let updated = update_ini(text, "User", "roles", &roles).unwrap();

        assert_eq!(updated, "[User]\nroles =\n    guest\n\n[Other]\nx = 1\n");
        let parsed = parse_ini(&updated).unwrap();
        let user = parsed.get("User").and_then(Value::as_mapping).unwrap();
        assert_eq!(
            user.get("roles"),
            Some(&Value::Sequence(vec![Value::from("guest")]))
        );
    }

    #[test]
    fn test_blank_line_inside_other_value_not_matched_as_key() {
        let text = "[A]\nurls =\n    a\n\n    key=1\nkey = real\n";
        let updated = update_ini(text, "A", "key", &Value::from("new")).unwrap();
        assert_eq!(updated, "[A]\nurls =\n    a\n\n    key=1\nkey = new\n");
    }

    #[test]
    fn test_comments_inside_replaced_value_are_kept() {
        let text = "[A]\nitems =\n    one\n    # keep me\n    two\n; trailing\nother = 1\n";
        let updated = update_ini(text, "A", "items", &Value::from("x")).unwrap();
        assert_eq!(
            updated,
            "[A]\nitems = x\n    # keep me\n; trailing\nother = 1\n"
        );
        let parsed = parse_ini(&updated).unwrap();
        let section = parsed.get("A").and_then(Value::as_mapping).unwrap();
        assert_eq!(section.get("items"), Some(&Value::from("x")));
    }

    #[test]
    fn test_mapping_value_rejected() {
        let mut nested = serde_yaml::Mapping::new();
        nested.insert(Value::from("a"), Value::from(1));
        let result = update_ini(SAMPLE, "Database", "host", &Value::Mapping(nested));
        assert!(matches!(result, Err(SaveError::UnsupportedIniValue { .. })));
    }
}
