//! Glossary loading API
//!
//! Entry point for reading a glossary in either representation. The scanner and the
//! annotator accept a glossary in both forms, so they go through here instead of
//! picking a reader themselves.
//!
//! # Architecture
//!
//! - String-based methods are the core functionality (process source text)
//! - File-based methods are thin wrappers (read file, detect format, then call the
//!   string method)
//!
//! # Examples
//!
//! ```rust,ignore
//! use glossa_core::glossary::loader::{GlossaryFormat, GlossaryLoader};
//!
//! let loader = GlossaryLoader::new();
//!
//! // Parse markup text
//! let store = loader.parse(source, GlossaryFormat::Markup, Path::new("glossario.tex"))?;
//!
//! // Load a file, format picked from the extension
//! let store = loader.load("glossario.json")?;
//!
//! // Only the names, including terms with an empty definition
//! let names = loader.load_names("glossario.tex")?;
//! ```

use crate::glossary::encoding::read_source;
use crate::glossary::error::{GlossaryError, GlossaryResult};
use crate::glossary::json::parse_glossary;
use crate::glossary::markup::{extract_terms, term_names};
use crate::glossary::store::TermStore;
use std::path::Path;
use tracing::debug;

/// Representation of a glossary file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlossaryFormat {
    /// LaTeX letter-sections (`.tex`, `.latex`)
    Markup,
    /// `{"terms": [...]}` and the tolerated variants (`.json`)
    Json,
}

impl GlossaryFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> GlossaryResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("tex") | Some("latex") => Ok(GlossaryFormat::Markup),
            Some("json") => Ok(GlossaryFormat::Json),
            _ => Err(GlossaryError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Primary API for glossary loading
///
/// # Design
///
/// - String-based methods (`parse`, `names`) are the core operations
/// - File-based methods (`load`, `load_names`) read files then delegate to string methods
#[derive(Debug, Clone, Copy, Default)]
pub struct GlossaryLoader;

impl GlossaryLoader {
    pub fn new() -> Self {
        Self
    }

    // ===== STRING-BASED PROCESSING (core methods) =====

    /// Parse glossary text into a store
    ///
    /// `origin` only appears in error messages.
    pub fn parse(&self, source: &str, format: GlossaryFormat, origin: &Path) -> GlossaryResult<TermStore> {
        match format {
            GlossaryFormat::Markup => Ok(extract_terms(source)),
            GlossaryFormat::Json => parse_glossary(source, origin),
        }
    }

    /// Term names of a glossary, sorted case-insensitively
    ///
    /// For markup this also includes subsections whose body is empty.
    pub fn names(&self, source: &str, format: GlossaryFormat, origin: &Path) -> GlossaryResult<Vec<String>> {
        match format {
            GlossaryFormat::Markup => Ok(term_names(source)),
            GlossaryFormat::Json => Ok(parse_glossary(source, origin)?.names()),
        }
    }

    // ===== FILE-BASED PROCESSING (convenience wrappers) =====

    /// Load a glossary file into a store
    pub fn load(&self, path: impl AsRef<Path>) -> GlossaryResult<TermStore> {
        let path = path.as_ref();
        let format = GlossaryFormat::from_path(path)?;
        let store = self.parse(&read_source(path)?, format, path)?;
        debug!(path = %path.display(), ?format, terms = store.len(), "loaded glossary");
        Ok(store)
    }

    /// Load only the term names of a glossary file
    pub fn load_names(&self, path: impl AsRef<Path>) -> GlossaryResult<Vec<String>> {
        let path = path.as_ref();
        let format = GlossaryFormat::from_path(path)?;
        let names = self.names(&read_source(path)?, format, path)?;
        debug!(path = %path.display(), ?format, terms = names.len(), "loaded glossary names");
        Ok(names)
    }
}
