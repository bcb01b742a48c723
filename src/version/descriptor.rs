//! Remote version descriptor format
//!
//! A descriptor is a small key/value document, one entry per line:
//!
//! ```text
//! # comments and blank lines are ignored
//! VERSION=1.4.2
//! UPDATE=https://example.com/plugin/download
//! CHANGELOG=Fixed login;Added region flags
//! ```
//!
//! `KEY: value` is accepted as well, keys are case-insensitive and the
//! changelog may also be written as a block list:
//!
//! ```text
//! [LIST=CHANGELOG]
//! Fixed login
//! Added region flags
//! [/LIST=CHANGELOG]
//! ```

use crate::version::error::UpdateError;

const VERSION_KEY: &str = "VERSION";
const UPDATE_KEY: &str = "UPDATE";
const CHANGELOG_KEY: &str = "CHANGELOG";

/// Separator between inline changelog entries
pub const CHANGELOG_DELIMITER: char = ';';

/// Latest version information published by a source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionDescriptor {
    pub remote_version: String,
    pub update_note: String,
    pub changelog: Vec<String>,
}

impl VersionDescriptor {
    /// Parse descriptor text
    ///
    /// A missing `VERSION` falls back to `current_version`, meaning the
    /// remote side reports nothing newer. Unknown keys are ignored.
    pub fn parse(content: &str, current_version: &str) -> Result<Self, UpdateError> {
        let mut remote_version = None;
        let mut update_note = String::new();
        let mut changelog = Vec::new();

        let mut lines = content.lines().enumerate();
        while let Some((index, raw)) = lines.next() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(list_key) = list_open_tag(line) {
                let entries = read_list_block(&mut lines, list_key, index + 1)?;
                if list_key.eq_ignore_ascii_case(CHANGELOG_KEY) {
                    changelog = entries;
                }
                continue;
            }

            let Some((key, value)) = split_entry(line) else {
                return Err(UpdateError::MalformedDescriptor(format!(
                    "line {}: expected KEY=value, got {:?}",
                    index + 1,
                    line
                )));
            };

            if key.eq_ignore_ascii_case(VERSION_KEY) {
                remote_version = Some(value.to_string());
            } else if key.eq_ignore_ascii_case(UPDATE_KEY) {
                update_note = value.to_string();
            } else if key.eq_ignore_ascii_case(CHANGELOG_KEY) {
                changelog = split_changelog(value);
            }
        }

        Ok(Self {
            remote_version: remote_version
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| current_version.to_string()),
            update_note,
            changelog,
        })
    }
}

/// Split `KEY=value` or `KEY: value` at whichever separator comes first
///
/// A colon only separates when followed by whitespace or the end of the line,
/// so `scheme://host` is not read as an entry.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let at = line.find(['=', ':'])?;
    let value = &line[at + 1..];
    if line[at..].starts_with(':') && !value.chars().next().is_none_or(char::is_whitespace) {
        return None;
    }
    let key = line[..at].trim();
    if key.is_empty() || !key.chars().all(is_key_char) {
        return None;
    }
    Some((key, unquote(value.trim())))
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn split_changelog(value: &str) -> Vec<String> {
    value
        .split(CHANGELOG_DELIMITER)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn list_open_tag(line: &str) -> Option<&str> {
    line.strip_prefix("[LIST=")?.strip_suffix(']').map(str::trim)
}

fn read_list_block<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    key: &str,
    opened_at: usize,
) -> Result<Vec<String>, UpdateError> {
    let mut entries = Vec::new();
    for (_, raw) in lines {
        let line = raw.trim();
        if let Some(closing) = line
            .strip_prefix("[/LIST=")
            .and_then(|rest| rest.strip_suffix(']'))
            && closing.trim().eq_ignore_ascii_case(key)
        {
            return Ok(entries);
        }
        if !line.is_empty() {
            entries.push(unquote(line).to_string());
        }
    }

    Err(UpdateError::MalformedDescriptor(format!(
        "line {}: list {:?} is never closed",
        opened_at, key
    )))
}
