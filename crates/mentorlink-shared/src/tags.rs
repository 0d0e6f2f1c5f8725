//! Parsing of the free-text, comma-separated tag fields.
//!
//! Stored tag fields are never normalized, so the invariant "trimmed,
//! lowercased, non-empty" is re-established on every parse.

use std::collections::BTreeSet;

use serde::Serialize;

/// Split a comma-separated field into comparable tags.
pub fn split_tags(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Split for display: trimmed, original casing kept.
pub fn display_tags(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// The set of skills a mentee is interested in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterestProfile {
    tokens: BTreeSet<String>,
}

impl InterestProfile {
    pub fn parse(field: &str) -> Self {
        Self {
            tokens: split_tags(field).into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}
