//! Keyword extraction for search indexing.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::{AttributeMap, AttributeScope};
use crate::types::Value;

/// Build the keyword list for a set of attributes.
///
/// Collects every key that is not well-known in `scope` plus every value.
/// Strings contribute verbatim, lists and maps contribute their JSON text, and
/// other scalars contribute nothing. The text is lower-cased, punctuation other
/// than `-` and `_` becomes a separator, purely numeric tokens are dropped, and
/// the unique tokens are returned in natural case-insensitive order.
pub fn keywordize(scope: AttributeScope, values: &AttributeMap) -> Vec<String> {
    let mut text = String::new();
    for (key, value) in values {
        if !scope.is_well_known(key) {
            text.push_str(key);
            text.push(' ');
        }
        match value {
            Value::String(s) => text.push_str(s),
            Value::Array(_) | Value::Map(_) => text.push_str(&value.to_string()),
            _ => {}
        }
        text.push(' ');
    }

    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut seen = HashSet::new();
    let mut words: Vec<String> = cleaned
        .split_whitespace()
        .filter(|word| !is_numeric(word))
        .filter(|word| seen.insert(*word))
        .map(str::to_string)
        .collect();

    words.sort_by(|a, b| natural_cmp(a, b));
    words
}

fn is_numeric(word: &str) -> bool {
    word.chars().all(|c| c.is_ascii_digit())
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    natord::compare_ignore_case(a, b)
}
