//! Differ: old store vs new store
//!
//! Names are matched case-insensitively (the store's identity rule). Whether two
//! definitions count as different is a single policy, [`CompareMode`].

use crate::glossary::store::TermStore;
use serde::{Deserialize, Serialize};

/// How definitions of a term present in both stores are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompareMode {
    #[default]
    Exact,
    CaseInsensitive,
}

impl CompareMode {
    pub fn differs(self, old: &str, new: &str) -> bool {
        match self {
            CompareMode::Exact => old != new,
            CompareMode::CaseInsensitive => old.to_lowercase() != new.to_lowercase(),
        }
    }
}

/// Classification of every name across two stores. All lists are sorted
/// case-insensitively and pairwise disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub removed: Vec<String>,
    pub unchanged: Vec<String>,
}

impl DiffResult {
    /// True when the stores hold the same terms with the same definitions.
    pub fn is_in_sync(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// Number of terms in the new store.
    pub fn new_total(&self) -> usize {
        self.added.len() + self.modified.len() + self.unchanged.len()
    }
}

/// Compare two stores. Pure; neither store is modified.
pub fn diff(old: &TermStore, new: &TermStore, mode: CompareMode) -> DiffResult {
    let mut result = DiffResult::default();

    for term in new {
        match old.get(&term.name) {
            None => result.added.push(term.name.clone()),
            Some(previous) if mode.differs(&previous.definition, &term.definition) => {
                result.modified.push(term.name.clone())
            }
            Some(_) => result.unchanged.push(term.name.clone()),
        }
    }

    result.removed = old
        .iter()
        .filter(|term| !new.contains(&term.name))
        .map(|term| term.name.clone())
        .collect();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn store(pairs: &[(&str, &str)]) -> TermStore {
        pairs.iter().copied().collect()
    }

    #[test]
    fn classifies_every_term() {
        let old = store(&[("API", "Interface"), ("Bug", "Defect"), ("Old", "Gone")]);
        let new = store(&[("api", "Interface"), ("Bug", "Error"), ("New", "Fresh")]);
        let result = diff(&old, &new, CompareMode::Exact);

        assert_eq!(result.added, vec!["New"]);
        assert_eq!(result.modified, vec!["Bug"]);
        assert_eq!(result.removed, vec!["Old"]);
        assert_eq!(result.unchanged, vec!["api"]);
        assert!(!result.is_in_sync());
        assert_eq!(result.new_total(), 3);
    }

    #[test]
    fn compare_mode_controls_modified() {
        let old = store(&[("API", "application interface")]);
        let new = store(&[("API", "Application Interface")]);
        assert_eq!(diff(&old, &new, CompareMode::Exact).modified, vec!["API"]);
        let relaxed = diff(&old, &new, CompareMode::CaseInsensitive);
        assert!(relaxed.modified.is_empty());
        assert!(relaxed.is_in_sync());
    }

    #[test]
    fn empty_new_store_removes_everything() {
        let old = store(&[("A", "1"), ("B", "2")]);
        let result = diff(&old, &TermStore::new(), CompareMode::Exact);
        assert_eq!(result.removed, vec!["A", "B"]);
        assert!(result.added.is_empty());
        assert!(result.modified.is_empty());
    }

    fn arb_store() -> impl Strategy<Value = TermStore> {
        proptest::collection::vec(("[a-dA-D]{1,2}", "[xy]{0,2}"), 0..12)
            .prop_map(|pairs| pairs.into_iter().collect())
    }

    fn folded(names: &[String]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_lowercase()).collect()
    }

    proptest! {
        #[test]
        fn diff_partitions_both_key_sets(old in arb_store(), new in arb_store()) {
            let result = diff(&old, &new, CompareMode::Exact);
            let added = folded(&result.added);
            let modified = folded(&result.modified);
            let unchanged = folded(&result.unchanged);
            let removed = folded(&result.removed);

            prop_assert!(added.is_disjoint(&modified));
            prop_assert!(added.is_disjoint(&unchanged));
            prop_assert!(modified.is_disjoint(&unchanged));

            let union: BTreeSet<String> = added.union(&modified).cloned().collect::<BTreeSet<_>>()
                .union(&unchanged).cloned().collect();
            prop_assert_eq!(union, folded(&new.names()));

            let new_keys = folded(&new.names());
            let expected_removed: BTreeSet<String> =
                folded(&old.names()).difference(&new_keys).cloned().collect();
            prop_assert_eq!(removed, expected_removed);
        }
    }
}
