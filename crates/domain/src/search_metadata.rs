//! Parameter analysis for view queries.
//!
//! Parameters are written as `$name$` inside a query; `$$` is a literal dollar
//! sign. A referenced parameter without a bound value on the view is
//! undeclared and makes the view non-executable until it is bound.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::View;

/// Derived parameter usage of a view's query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMetadata {
    used: BTreeSet<String>,
    undeclared: BTreeSet<String>,
}

impl SearchMetadata {
    /// Creates metadata from precomputed sets.
    #[must_use]
    pub fn new(used: BTreeSet<String>, undeclared: BTreeSet<String>) -> Self {
        Self { used, undeclared }
    }

    /// Analyzes the query of `view` against its parameter bindings.
    #[must_use]
    pub fn analyze(view: &View) -> Self {
        let used = referenced_parameters(view.query());
        let undeclared = used
            .iter()
            .filter(|name| !view.parameter_bindings().contains_key(name.as_str()))
            .cloned()
            .collect();

        Self { used, undeclared }
    }

    /// Returns every parameter the query references.
    #[must_use]
    pub fn used(&self) -> &BTreeSet<String> {
        &self.used
    }

    /// Returns referenced parameters that have no bound value.
    #[must_use]
    pub fn undeclared(&self) -> &BTreeSet<String> {
        &self.undeclared
    }

    /// Returns whether any referenced parameter is unbound.
    #[must_use]
    pub fn has_undeclared_parameters(&self) -> bool {
        !self.undeclared.is_empty()
    }
}

/// Returns names of all `$name$` placeholders in `query`.
#[must_use]
pub fn referenced_parameters(query: &str) -> BTreeSet<String> {
    let bytes = query.as_bytes();
    let mut found = BTreeSet::new();
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] != b'$' {
            index += 1;
            continue;
        }
        if bytes.get(index + 1) == Some(&b'$') {
            index += 2;
            continue;
        }

        let start = index + 1;
        let mut end = start;
        while end < bytes.len() && is_name_byte(bytes[end], end == start) {
            end += 1;
        }

        if end > start && bytes.get(end) == Some(&b'$') {
            found.insert(query[start..end].to_owned());
            index = end + 1;
        } else {
            index += 1;
        }
    }

    found
}

fn is_name_byte(byte: u8, first: bool) -> bool {
    byte == b'_' || byte.is_ascii_alphabetic() || (!first && byte.is_ascii_digit())
}
