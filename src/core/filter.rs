// TableKit - core/filter.rs
//
// Row filter engine for record tables.
// All active filters are AND-combined.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::value::{display_text, lookup};
use crate::util::constants::MAX_REGEX_PATTERN_LENGTH;
use crate::util::error::FilterError;
use regex::Regex;
use serde_json::Value;

/// Complete filter state. All fields are AND-combined when applied.
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    /// Field paths searched by text and regex filters.
    /// Empty = every scalar value in the record, at any depth.
    pub keys: Vec<String>,

    /// Substring text search. Empty = no filter.
    pub text_search: String,

    /// Match `text_search` with case significance.
    pub case_sensitive: bool,

    /// Compiled regex search. None = no regex filter.
    pub regex_search: Option<Regex>,
}

impl RowFilter {
    /// Filter searching only the given field paths.
    pub fn with_keys(keys: Vec<String>) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }

    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.text_search.is_empty() && self.regex_search.is_none()
    }

    /// Set the text search query.
    pub fn set_text(&mut self, query: &str) {
        self.text_search = query.to_string();
    }

    /// Set the regex search pattern, compiling it.
    /// Returns an error if the pattern is too long or invalid.
    pub fn set_regex(&mut self, pattern: &str) -> Result<(), FilterError> {
        if pattern.is_empty() {
            self.regex_search = None;
            return Ok(());
        }
        if pattern.len() > MAX_REGEX_PATTERN_LENGTH {
            return Err(FilterError::RegexTooLong {
                length: pattern.len(),
                max_length: MAX_REGEX_PATTERN_LENGTH,
            });
        }
        let regex = Regex::new(pattern).map_err(|e| FilterError::InvalidRegex {
            pattern: pattern.to_string(),
            source: e,
        })?;
        self.regex_search = Some(regex);
        Ok(())
    }

    /// Remove all active filters, keeping the searched keys.
    pub fn clear(&mut self) {
        self.text_search.clear();
        self.regex_search = None;
    }

    fn needle(&self) -> String {
        if self.case_sensitive {
            self.text_search.clone()
        } else {
            self.text_search.to_lowercase()
        }
    }
}

/// Apply filters to a slice of rows, returning indices of matching rows.
///
/// Returns a Vec of indices into the original slice so callers can keep
/// their own ordering and avoid copying rows.
pub fn apply_filter(rows: &[Value], filter: &RowFilter) -> Vec<usize> {
    if filter.is_empty() {
        return (0..rows.len()).collect();
    }

    let needle = filter.needle();

    rows.iter()
        .enumerate()
        .filter(|(_, row)| matches_all(row, filter, &needle))
        .map(|(idx, _)| idx)
        .collect()
}

/// Check if a single row matches all active filters.
fn matches_all(row: &Value, filter: &RowFilter, needle: &str) -> bool {
    let texts = searchable_texts(row, &filter.keys);

    // Text search (substring in any searched field)
    if !needle.is_empty() {
        let found = texts.iter().any(|text| {
            if filter.case_sensitive {
                text.contains(needle)
            } else {
                text.to_lowercase().contains(needle)
            }
        });
        if !found {
            return false;
        }
    }

    // Regex search
    if let Some(ref regex) = filter.regex_search {
        if !texts.iter().any(|text| regex.is_match(text)) {
            return false;
        }
    }

    true
}

/// Text form of every searched field in `row`.
fn searchable_texts(row: &Value, keys: &[String]) -> Vec<String> {
    if keys.is_empty() {
        let mut out = Vec::new();
        collect_scalars(row, &mut out);
        return out;
    }
    keys.iter()
        .filter_map(|key| lookup(row, key))
        .map(display_text)
        .collect()
}

fn collect_scalars(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => map.values().for_each(|v| collect_scalars(v, out)),
        Value::Array(items) => items.iter().for_each(|v| collect_scalars(v, out)),
        Value::Null => {}
        scalar => out.push(display_text(scalar)),
    }
}
