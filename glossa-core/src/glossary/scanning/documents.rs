//! Document discovery and line lookup
//!
//! A scan target is either one file or a directory walked recursively. Walking uses
//! `ignore::WalkBuilder` with every filter off: hidden files and gitignored build
//! output are still scanned.

use crate::glossary::error::{GlossaryError, GlossaryResult};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extensions scanned when walking a directory.
pub const DEFAULT_EXTENSIONS: &[&str] = &["tex", "latex"];

/// Collect the documents under `root`, sorted by path.
///
/// A file is returned as is, whatever its extension. A directory yields every file
/// whose extension is in `extensions` (case-insensitive).
pub fn find_documents<S: AsRef<str>>(root: &Path, extensions: &[S]) -> GlossaryResult<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.exists() {
        return Err(GlossaryError::MissingFile(root.to_path_buf()));
    }

    let mut documents = Vec::new();
    for entry in WalkBuilder::new(root).standard_filters(false).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if has_extension(entry.path(), extensions) {
            documents.push(entry.into_path());
        }
    }
    documents.sort();
    debug!(root = %root.display(), count = documents.len(), "collected documents");
    Ok(documents)
}

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

/// Byte offset → line/column lookup for one text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    /// Zero-based line containing `offset`.
    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset) - 1
    }

    /// One-based line and column (in characters) of `offset`.
    pub fn position(&self, text: &str, offset: usize) -> (usize, usize) {
        let line = self.line_of(offset);
        let column = text[self.starts[line]..offset].chars().count() + 1;
        (line + 1, column)
    }

    /// The full line containing `offset`, without its line break.
    pub fn line_text<'a>(&self, text: &'a str, offset: usize) -> &'a str {
        let line = self.line_of(offset);
        let start = self.starts[line];
        let end = self
            .starts
            .get(line + 1)
            .map_or(text.len(), |&next| next - 1);
        text[start..end].trim_end_matches('\r')
    }
}
