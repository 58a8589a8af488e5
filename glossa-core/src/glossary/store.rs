//! Term store
//!
//! The in-memory name → definition mapping every pipeline works on. Names keep
//! their original casing but uniqueness, lookups and ordering are case-insensitive,
//! so the store never holds two entries whose names differ only by case.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single glossary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    #[serde(rename = "term")]
    pub name: String,
    pub definition: String,
}

impl Term {
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
        }
    }
}

/// Key used for case-insensitive identity and ordering.
pub fn fold_key(name: &str) -> String {
    name.to_lowercase()
}

/// Case-insensitive, case-preserving term map. Iteration is alphabetical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermStore {
    entries: BTreeMap<String, Term>,
}

impl TermStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a term, trimming its name.
    ///
    /// Returns `false` (and stores nothing) when the trimmed name is empty. A name
    /// colliding case-insensitively with an existing one replaces it, casing included.
    pub fn insert(&mut self, name: &str, definition: impl Into<String>) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.entries
            .insert(fold_key(name), Term::new(name, definition));
        true
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.entries.get(&fold_key(name.trim()))
    }

    pub fn definition(&self, name: &str) -> Option<&str> {
        self.get(name).map(|term| term.definition.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Term> {
        self.entries.remove(&fold_key(name.trim()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Terms in case-insensitive alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.entries.values()
    }

    /// Names in case-insensitive alphabetical order.
    pub fn names(&self) -> Vec<String> {
        self.iter().map(|term| term.name.clone()).collect()
    }

    /// Names ordered longest first; ties keep alphabetical order.
    pub fn names_longest_first(&self) -> Vec<String> {
        let mut names = self.names();
        names.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        names
    }
}

impl<'a> IntoIterator for &'a TermStore {
    type Item = &'a Term;
    type IntoIter = std::collections::btree_map::Values<'a, String, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl<N: AsRef<str>, D: Into<String>> FromIterator<(N, D)> for TermStore {
    fn from_iter<I: IntoIterator<Item = (N, D)>>(iter: I) -> Self {
        let mut store = TermStore::new();
        for (name, definition) in iter {
            store.insert(name.as_ref(), definition);
        }
        store
    }
}
