//! Extractor: markup → TermStore
//!
//! Walks the boundary tokens with three states:
//!
//! - `Outside`: before the first letter-section, or inside a non-letter section
//! - `InSection`: inside a letter-section but not inside a term
//! - `InSubsection`: collecting a term body
//!
//! A term body runs from its `\subsection{..}` to the next subsection, any section,
//! `\end{document}` or the end of input. Page breaks are body content; cleaning removes
//! them, so a definition continued on the next page stays whole.

use crate::glossary::markup::clean::clean_text;
use crate::glossary::markup::tokens::{tokenize, MarkupToken};
use crate::glossary::store::{fold_key, TermStore};
use std::collections::BTreeMap;
use std::ops::Range;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    Outside,
    InSection,
    InSubsection,
}

/// A raw subsection span found by the walk, before cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry<'a> {
    pub title: &'a str,
    pub body: &'a str,
    /// From the start of the `\subsection` marker to the end of the body.
    pub range: Range<usize>,
}

struct Walk<'a> {
    source: &'a str,
    state: WalkState,
    open: Option<(&'a str, usize, usize)>,
    entries: Vec<RawEntry<'a>>,
}

impl<'a> Walk<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            state: WalkState::Outside,
            open: None,
            entries: Vec::new(),
        }
    }

    fn close(&mut self, at: usize) {
        if let Some((title, marker_start, body_start)) = self.open.take() {
            self.entries.push(RawEntry {
                title,
                body: &self.source[body_start..at],
                range: marker_start..at,
            });
        }
        if self.state == WalkState::InSubsection {
            self.state = WalkState::InSection;
        }
    }

    fn step(&mut self, token: &'a MarkupToken) {
        match token {
            MarkupToken::Section { .. } => {
                self.close(token.start());
                self.state = if token.is_letter_section() {
                    WalkState::InSection
                } else {
                    WalkState::Outside
                };
            }
            MarkupToken::Subsection { title, .. } => {
                if self.state == WalkState::Outside {
                    return;
                }
                self.close(token.start());
                self.open = Some((title.as_str(), token.start(), token.end()));
                self.state = WalkState::InSubsection;
            }
            MarkupToken::PageBreak { .. } => {}
            MarkupToken::DocumentEnd { .. } => {
                self.close(token.start());
                self.state = WalkState::Outside;
            }
        }
    }

    fn finish(mut self) -> Vec<RawEntry<'a>> {
        self.close(self.source.len());
        self.entries
    }
}

/// Collect the raw subsection spans that belong to letter-sections.
pub fn walk_entries<'a>(source: &'a str, tokens: &'a [MarkupToken]) -> Vec<RawEntry<'a>> {
    let mut walk = Walk::new(source);
    for token in tokens {
        walk.step(token);
    }
    walk.finish()
}

/// Build a TermStore from markup source.
///
/// Pairs whose cleaned title or definition is empty are dropped; a repeated title
/// overwrites the earlier entry.
pub fn extract_terms(source: &str) -> TermStore {
    let tokens = tokenize(source);
    let mut store = TermStore::new();
    let mut skipped = 0usize;

    for entry in walk_entries(source, &tokens) {
        let name = clean_text(entry.title);
        let definition = clean_text(entry.body);
        if name.is_empty() || definition.is_empty() {
            skipped += 1;
            continue;
        }
        store.insert(&name, definition);
    }

    debug!(terms = store.len(), skipped, "extracted terms from markup");
    store
}

/// Cleaned subsection titles, regardless of whether the body is empty.
///
/// Duplicates are removed case-insensitively (first spelling kept); the result is
/// sorted case-insensitively.
pub fn term_names(source: &str) -> Vec<String> {
    let tokens = tokenize(source);
    let mut names: BTreeMap<String, String> = BTreeMap::new();
    for entry in walk_entries(source, &tokens) {
        let name = clean_text(entry.title);
        if !name.is_empty() {
            names.entry(fold_key(&name)).or_insert(name);
        }
    }
    names.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLOSSARY: &str = r"\documentclass{article}
\begin{document}
\section{Introduzione}
\subsection{Scopo}
Not a term.
\newpage

\section{A}
\subsection{API}
Application \textbf{Programming} Interface
% internal note
\subsection{Analisi}
Studio del problema.

\newpage
\section{B}
\subsection{Backlog}
Elenco delle attività.
\end{document}
";

    #[test]
    fn extracts_terms_from_letter_sections_only() {
        let store = extract_terms(GLOSSARY);
        assert_eq!(store.names(), vec!["Analisi", "API", "Backlog"]);
        assert_eq!(
            store.definition("API"),
            Some("Application Programming Interface")
        );
        assert_eq!(store.definition("Backlog"), Some("Elenco delle attività."));
        assert!(!store.contains("Scopo"));
    }

    #[test]
    fn document_end_is_not_part_of_the_last_definition() {
        let store = extract_terms(GLOSSARY);
        assert!(!store.definition("Backlog").unwrap().contains("end"));
    }

    #[test]
    fn empty_input_yields_empty_store() {
        assert!(extract_terms("").is_empty());
        assert!(extract_terms("just some prose").is_empty());
    }

    #[test]
    fn unterminated_spans_run_to_end_of_input() {
        let store = extract_terms("\\section{C}\n\\subsection{Commit}\nSnapshot of changes");
        assert_eq!(store.definition("Commit"), Some("Snapshot of changes"));
    }

    #[test]
    fn last_duplicate_wins() {
        let source = "\\section{D}\n\\subsection{Deploy}\nfirst\n\\subsection{deploy}\nsecond\n";
        let store = extract_terms(source);
        assert_eq!(store.len(), 1);
        assert_eq!(store.names(), vec!["deploy"]);
        assert_eq!(store.definition("Deploy"), Some("second"));
    }

    #[test]
    fn empty_definitions_are_dropped() {
        let source = "\\section{E}\n\\subsection{Epic}\n\n\\subsection{Estimate}\nGuess.\n";
        let store = extract_terms(source);
        assert_eq!(store.names(), vec!["Estimate"]);
    }

    #[test]
    fn term_names_include_empty_bodies() {
        let source = "\\section{E}\n\\subsection{Epic}\n\n\\subsection{epic}\n\\subsection{Estimate}\nGuess.\n";
        assert_eq!(term_names(source), vec!["Epic", "Estimate"]);
    }

    #[test]
    fn definition_continues_across_a_page_break() {
        let source = "\\section{F}\n\\subsection{Fork}\nCopy of a repo.\n\\newpage\ncontinued on the next page.\n";
        let store = extract_terms(source);
        assert_eq!(
            store.definition("Fork"),
            Some("Copy of a repo. continued on the next page.")
        );
    }

    #[test]
    fn trailing_page_break_before_next_section_is_dropped() {
        let source = "\\section{F}\n\\subsection{Fork}\nCopy.\n\n\\newpage\n\n\\section{G}\n\\subsection{Git}\nVCS\n";
        let store = extract_terms(source);
        assert_eq!(store.definition("Fork"), Some("Copy."));
        assert_eq!(store.definition("Git"), Some("VCS"));
    }

    #[test]
    fn walk_reports_raw_ranges() {
        let source = "\\section{G}\n\\subsection{Git}\nVCS\n";
        let tokens = tokenize(source);
        let entries = walk_entries(source, &tokens);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Git");
        assert_eq!(entries[0].body, "\nVCS\n");
        assert_eq!(&source[entries[0].range.clone()], "\\subsection{Git}\nVCS\n");
    }
}
