//! Testing utilities
//!
//! Glossary markup is easy to get subtly wrong by hand (a stray `%`, a missing
//! `\end{document}`), so tests that need a realistic document load one of the curated
//! fixtures under `glossa-core/fixtures/` instead of inventing one:
//!
//! ```rust,ignore
//! use glossa_core::glossary::testing::Fixture;
//!
//! let source = Fixture::GlossaryMarkup.source();
//! let store = Fixture::GlossaryJson.store();
//! let copy = Fixture::Document.copy_to(dir.path());
//! ```
//!
//! Every accessor panics on failure: a broken fixture is a broken test.

use crate::glossary::loader::GlossaryLoader;
use crate::glossary::store::TermStore;
use std::fs;
use std::path::{Path, PathBuf};

/// The curated fixture files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixture {
    /// A complete glossary document with an introduction and seven terms
    GlossaryMarkup,
    /// An older JSON export of the same glossary (one term modified, one removed)
    GlossaryJson,
    /// A project document using the glossary terms, partly annotated
    Document,
}

impl Fixture {
    pub fn file_name(self) -> &'static str {
        match self {
            Fixture::GlossaryMarkup => "glossario.tex",
            Fixture::GlossaryJson => "glossario.json",
            Fixture::Document => "documento.tex",
        }
    }

    pub fn path(self) -> PathBuf {
        fixtures_dir().join(self.file_name())
    }

    pub fn source(self) -> String {
        let path = self.path();
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
    }

    /// Load the fixture as a glossary. Panics for [`Fixture::Document`].
    pub fn store(self) -> TermStore {
        let path = self.path();
        GlossaryLoader::new()
            .load(&path)
            .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", path.display(), e))
    }

    /// Copy the fixture into `dir`, returning the new path.
    pub fn copy_to(self, dir: &Path) -> PathBuf {
        let target = dir.join(self.file_name());
        fs::copy(self.path(), &target)
            .unwrap_or_else(|e| panic!("Failed to copy fixture to {}: {}", target.display(), e));
        target
    }
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Term names as owned strings.
pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_exist() {
        for fixture in [Fixture::GlossaryMarkup, Fixture::GlossaryJson, Fixture::Document] {
            assert!(fixture.path().is_file(), "{:?} missing", fixture);
        }
    }

    #[test]
    fn markup_fixture_holds_seven_terms() {
        let store = Fixture::GlossaryMarkup.store();
        assert_eq!(store.len(), 7);
        assert_eq!(
            store.definition("Requirements and Technology Baseline"),
            Some("Milestone in cui requisiti & tecnologie vengono fissati.")
        );
        assert!(!store.contains("Bozza"));
    }
}
