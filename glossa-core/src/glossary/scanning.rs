//! Occurrence scanner
//!
//! Finds glossary terms in document text and reports which occurrences lack an
//! annotation marker.
//!
//! A scan runs in four stages:
//!
//! 1. exclusion zones are computed once per text (see [`exclusion`])
//! 2. terms are visited longest first, each expanded into its variants
//! 3. every variant match outside the zones and outside the coverage of longer terms
//!    is kept, and the term then claims its spans
//! 4. each kept occurrence is tested for a following marker (see [`marker`])
//!
//! Results come back in the order the terms were given, whatever order they were
//! scanned in.

pub mod coverage;
pub mod documents;
pub mod exclusion;
pub mod marker;
pub mod matcher;

pub use coverage::Coverage;
pub use documents::{find_documents, LineIndex, DEFAULT_EXTENSIONS};
pub use exclusion::{ExclusionRules, ExclusionZones, DEFAULT_PATH_COMMANDS};
pub use marker::{MarkerSet, EXPANDED_MARKER, SHORT_MARKER};
pub use matcher::VariantMatcher;

use crate::glossary::encoding::read_source;
use crate::glossary::error::GlossaryResult;
use crate::glossary::progress::{is_checkpoint, NoProgress, ProgressSink};
use crate::glossary::variants;
use serde::Serialize;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Scanner settings.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub markers: MarkerSet,
    pub exclusions: ExclusionRules,
    /// Report progress every N terms; 0 reports on every term.
    pub progress_every: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            markers: MarkerSet::default(),
            exclusions: ExclusionRules::default(),
            progress_every: 10,
        }
    }
}

/// One kept match of a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    #[serde(skip)]
    pub range: Range<usize>,
    pub line: usize,
    pub column: usize,
    pub line_text: String,
    /// The variant that matched.
    pub variant: String,
    /// Whether a marker already follows the occurrence.
    pub marked: bool,
}

/// Everything found for one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermScan {
    pub term: String,
    pub occurrences: Vec<Occurrence>,
}

impl TermScan {
    pub fn is_found(&self) -> bool {
        !self.occurrences.is_empty()
    }

    pub fn unmarked(&self) -> impl Iterator<Item = &Occurrence> {
        self.occurrences.iter().filter(|o| !o.marked)
    }
}

/// A term with at least one unmarked occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingMarker {
    pub term: String,
    /// All kept occurrences of the term, marked or not.
    pub total: usize,
    /// The unmarked ones, sorted by position.
    pub occurrences: Vec<Occurrence>,
}

/// Classification of every scanned term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    pub not_found: Vec<String>,
    pub missing: Vec<MissingMarker>,
}

impl ScanOutcome {
    /// True when every found term is fully marked.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn missing_occurrences(&self) -> usize {
        self.missing.iter().map(|m| m.occurrences.len()).sum()
    }

    fn record(&mut self, scan: TermScan) {
        if !scan.is_found() {
            self.not_found.push(scan.term);
            return;
        }
        let total = scan.occurrences.len();
        let occurrences: Vec<Occurrence> = scan.occurrences.into_iter().filter(|o| !o.marked).collect();
        if !occurrences.is_empty() {
            self.missing.push(MissingMarker {
                term: scan.term,
                total,
                occurrences,
            });
        }
    }
}

/// Scan result of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileScan {
    pub path: PathBuf,
    pub outcome: ScanOutcome,
}

/// A text prepared for scanning: exclusion zones and line starts are computed once.
#[derive(Debug)]
pub struct PreparedText<'a> {
    text: &'a str,
    zones: ExclusionZones,
    lines: LineIndex,
}

impl<'a> PreparedText<'a> {
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn zones(&self) -> &ExclusionZones {
        &self.zones
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn prepare<'a>(&self, text: &'a str) -> PreparedText<'a> {
        PreparedText {
            text,
            zones: self.options.exclusions.zones(text),
            lines: LineIndex::new(text),
        }
    }

    /// Scan one term against `coverage`, then claim its occurrences.
    ///
    /// Variants of the same term never hide each other. When two variants match
    /// overlapping spans the earlier variant (the original term first) wins.
    pub fn scan_term(&self, prepared: &PreparedText<'_>, term: &str, coverage: &mut Coverage) -> TermScan {
        let text = prepared.text;
        let mut kept: Vec<(Range<usize>, String)> = Vec::new();

        for variant in variants::generate(term).iter() {
            let matcher = match VariantMatcher::new(variant) {
                Ok(matcher) => matcher,
                Err(err) => {
                    warn!(term, variant, error = %err, "variant cannot be compiled");
                    continue;
                }
            };
            for range in matcher.find_all(text) {
                if prepared.zones.overlaps(&range) || coverage.overlaps(&range) {
                    continue;
                }
                if kept.iter().any(|(other, _)| overlaps(other, &range)) {
                    continue;
                }
                kept.push((range, variant.to_string()));
            }
        }

        kept.sort_by_key(|(range, _)| range.start);
        let occurrences = kept
            .into_iter()
            .map(|(range, variant)| {
                coverage.claim(range.clone());
                let (line, column) = prepared.lines.position(text, range.start);
                Occurrence {
                    line,
                    column,
                    line_text: prepared.lines.line_text(text, range.start).trim().to_string(),
                    marked: self.options.markers.is_marked_after(text, range.end),
                    variant,
                    range,
                }
            })
            .collect();

        TermScan {
            term: term.to_string(),
            occurrences,
        }
    }

    /// Scan every term, longest first, returning per-term results in input order.
    pub fn scan_terms(&self, text: &str, terms: &[String], progress: &dyn ProgressSink) -> Vec<TermScan> {
        let prepared = self.prepare(text);
        let mut order: Vec<usize> = (0..terms.len()).collect();
        order.sort_by(|&a, &b| terms[b].chars().count().cmp(&terms[a].chars().count()));

        let mut coverage = Coverage::new();
        let mut results: Vec<Option<TermScan>> = vec![None; terms.len()];
        for (position, &index) in order.iter().enumerate() {
            if is_checkpoint(position, self.options.progress_every) {
                let percent = position as f32 * 100.0 / terms.len().max(1) as f32;
                progress.report(percent, &format!("Scanning term {}/{}", position + 1, terms.len()));
            }
            results[index] = Some(self.scan_term(&prepared, &terms[index], &mut coverage));
        }
        progress.report(100.0, "Scan complete");

        results.into_iter().flatten().collect()
    }

    /// Classify every term into not-found and missing-marker lists.
    pub fn scan(&self, text: &str, terms: &[String]) -> ScanOutcome {
        self.scan_with_progress(text, terms, &NoProgress)
    }

    pub fn scan_with_progress(&self, text: &str, terms: &[String], progress: &dyn ProgressSink) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        for scan in self.scan_terms(text, terms, progress) {
            outcome.record(scan);
        }
        debug!(
            not_found = outcome.not_found.len(),
            missing = outcome.missing.len(),
            "scan finished"
        );
        outcome
    }

    /// Scan a file or every document under a directory.
    ///
    /// Files that cannot be read are skipped with a warning sent to `progress`.
    pub fn scan_path(
        &self,
        root: &Path,
        extensions: &[String],
        terms: &[String],
        progress: &dyn ProgressSink,
    ) -> GlossaryResult<Vec<FileScan>> {
        let documents = find_documents(root, extensions)?;
        let count = documents.len();
        let mut scans = Vec::with_capacity(count);

        for (index, path) in documents.into_iter().enumerate() {
            progress.report(
                index as f32 * 100.0 / count.max(1) as f32,
                &format!("Scanning {}", path.display()),
            );
            let text = match read_source(&path) {
                Ok(text) => text,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable document");
                    progress.warn(&err.to_string());
                    continue;
                }
            };
            let outcome = self.scan(&text, terms);
            scans.push(FileScan { path, outcome });
        }
        progress.report(100.0, "Scan complete");
        Ok(scans)
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glossary::progress::RecordingProgress;

    fn terms(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn scan(text: &str, names: &[&str]) -> ScanOutcome {
        Scanner::default().scan(text, &terms(names))
    }

    #[test]
    fn reports_unmarked_and_not_found_terms() {
        let text = "The API\\G is documented.\nEvery API must be versioned.";
        let outcome = scan(text, &["API", "Backlog"]);

        assert_eq!(outcome.not_found, vec!["Backlog"]);
        assert_eq!(outcome.missing.len(), 1);
        let missing = &outcome.missing[0];
        assert_eq!(missing.term, "API");
        assert_eq!(missing.total, 2);
        assert_eq!(missing.occurrences.len(), 1);
        assert_eq!(missing.occurrences[0].line, 2);
        assert_eq!(missing.occurrences[0].column, 7);
        assert_eq!(missing.occurrences[0].line_text, "Every API must be versioned.");
    }

    #[test]
    fn fully_marked_terms_are_clean() {
        let outcome = scan("API\\G and API\\textsubscript{\\scalebox{0.6}{\\textbf{G}}}", &["API"]);
        assert!(outcome.is_clean());
        assert!(outcome.not_found.is_empty());
    }

    #[test]
    fn longer_terms_claim_their_span() {
        let text = "Read the Verbale interno\\G first.";
        let outcome = scan(text, &["Verbale", "Verbale interno"]);
        assert_eq!(outcome.not_found, vec!["Verbale"]);
        assert!(outcome.is_clean());
    }

    #[test]
    fn variants_share_one_term() {
        let text = "A POC is a Proof of Concept\\G, see POC (Proof of Concept).";
        let outcome = scan(text, &["POC (Proof of Concept)"]);
        let missing = &outcome.missing[0];
        assert_eq!(missing.total, 3);
        let variants: Vec<&str> = missing.occurrences.iter().map(|o| o.variant.as_str()).collect();
        assert_eq!(variants, vec!["POC", "POC (Proof of Concept)"]);
    }

    #[test]
    fn excluded_matches_are_discarded() {
        let text = "\\input{capitoli/API}\nhttps://example.com/API";
        let outcome = scan(text, &["API"]);
        assert_eq!(outcome.not_found, vec!["API"]);
    }

    #[test]
    fn results_follow_input_order() {
        let text = "Backlog and Way of Working";
        let scans = Scanner::default().scan_terms(text, &terms(&["Backlog", "Way of Working"]), &NoProgress);
        let names: Vec<&str> = scans.iter().map(|s| s.term.as_str()).collect();
        assert_eq!(names, vec!["Backlog", "Way of Working"]);
    }

    #[test]
    fn progress_reaches_completion() {
        let recorder = RecordingProgress::default();
        let names: Vec<String> = (0..25).map(|i| format!("term{i}")).collect();
        Scanner::default().scan_with_progress("nothing here", &names, &recorder);
        let events = recorder.events();
        assert_eq!(events.len(), 4);
        assert_eq!(events.last().map(|e| e.percent), Some(100));
        assert!(events.windows(2).all(|w| w[0].percent <= w[1].percent));
    }

    #[test]
    fn scans_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.tex"), "API here").unwrap();
        std::fs::write(dir.path().join("b.tex"), "API\\G here").unwrap();
        let recorder = RecordingProgress::default();
        let scans = Scanner::default()
            .scan_path(dir.path(), &terms(&["tex"]), &terms(&["API"]), &recorder)
            .unwrap();
        assert_eq!(scans.len(), 2);
        assert!(!scans[0].outcome.is_clean());
        assert!(scans[1].outcome.is_clean());
    }
}
