//! Annotator
//!
//! Inserts the primary marker after every unmarked term occurrence of a document.
//! Occurrences are found with the [`Scanner`], so exclusion zones and the
//! longest-term-wins rule apply exactly as in a scan. Annotating an annotated text
//! changes nothing.

use crate::glossary::progress::{NoProgress, ProgressSink};
use crate::glossary::scanning::marker::{parenthetical_acronym_end, skip_whitespace};
use crate::glossary::scanning::Scanner;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotateOptions {
    /// Only annotate terms made of more than one word.
    pub multi_word_only: bool,
}

/// The annotated text plus what was inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotated {
    pub text: String,
    pub inserted: usize,
    /// Markers inserted per term; terms with none are absent.
    pub per_term: BTreeMap<String, usize>,
}

impl Annotated {
    pub fn is_unchanged(&self) -> bool {
        self.inserted == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Annotator {
    scanner: Scanner,
    options: AnnotateOptions,
}

struct Insertion {
    at: usize,
    occurrence: Range<usize>,
    term: String,
}

impl Annotator {
    pub fn new(scanner: Scanner, options: AnnotateOptions) -> Self {
        Self { scanner, options }
    }

    pub fn annotate(&self, text: &str, terms: &[String]) -> Annotated {
        self.annotate_with_progress(text, terms, &NoProgress)
    }

    pub fn annotate_with_progress(&self, text: &str, terms: &[String], progress: &dyn ProgressSink) -> Annotated {
        let selected: Vec<String> = terms
            .iter()
            .filter(|term| !self.options.multi_word_only || term.trim().contains(char::is_whitespace))
            .cloned()
            .collect();

        let markers = &self.scanner.options().markers;
        let mut insertions: Vec<Insertion> = Vec::new();
        let mut absorbed: Vec<Range<usize>> = Vec::new();

        for scan in self.scanner.scan_terms(text, &selected, progress) {
            for occurrence in scan.unmarked() {
                let end = occurrence.range.end;
                let mut at = end;
                if occurrence.variant.contains(char::is_whitespace) {
                    if let Some(after) = parenthetical_acronym_end(text, skip_whitespace(text, end)) {
                        absorbed.push(end..after);
                        at = after;
                    }
                }
                insertions.push(Insertion {
                    at,
                    occurrence: occurrence.range.clone(),
                    term: scan.term.clone(),
                });
            }
        }

        // An acronym inside a phrase's "(XYZ)" is marked by the phrase's insertion.
        insertions.retain(|insertion| {
            !absorbed
                .iter()
                .any(|span| span.start <= insertion.occurrence.start && insertion.occurrence.end <= span.end)
        });

        let mut seen = BTreeSet::new();
        insertions.retain(|insertion| seen.insert(insertion.at));
        insertions.retain(|insertion| !markers.is_marked_after(text, insertion.at));
        insertions.sort_by_key(|insertion| insertion.at);

        let mut annotated = text.to_string();
        let mut per_term: BTreeMap<String, usize> = BTreeMap::new();
        for insertion in insertions.iter().rev() {
            annotated.insert_str(insertion.at, markers.primary());
            *per_term.entry(insertion.term.clone()).or_default() += 1;
        }

        debug!(inserted = insertions.len(), "annotation finished");
        Annotated {
            text: annotated,
            inserted: insertions.len(),
            per_term,
        }
    }
}
