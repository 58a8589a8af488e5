//! Plain-text reports
//!
//! Reports are built as strings so the CLI can print them, export them to a file, or
//! both. Long name lists are cut to a preview with an "... and N more" line.

use crate::glossary::diff::DiffResult;
use crate::glossary::scanning::FileScan;
use std::fmt::Write as _;
use std::path::Path;

/// Names listed per category in a diff analysis.
pub const ANALYSIS_PREVIEW: usize = 20;

/// Longest line excerpt printed for an occurrence, in characters.
const EXCERPT_WIDTH: usize = 80;

const RULE_WIDTH: usize = 80;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn push_preview(out: &mut Vec<String>, title: &str, names: &[String], preview: usize) {
    if names.is_empty() {
        return;
    }
    out.push(String::new());
    out.push(title.to_string());
    out.extend(names.iter().take(preview).map(|name| format!("  - {name}")));
    if names.len() > preview {
        out.push(format!("  ... and {} more", names.len() - preview));
    }
}

/// Summary of a completed (or dry-run) sync.
pub fn sync_report(markup: &Path, json: &Path, diff: &DiffResult, preview: usize) -> String {
    let mut out = vec![
        rule(),
        "GLOSSARY SYNC REPORT".to_string(),
        rule(),
        format!("Markup file: {}", file_name(markup)),
        format!("JSON file: {}", file_name(json)),
        format!("Total terms: {}", diff.new_total()),
        rule(),
        String::new(),
        "Statistics:".to_string(),
        format!("  Added: {}", diff.added.len()),
        format!("  Modified: {}", diff.modified.len()),
        format!("  Removed: {}", diff.removed.len()),
        format!("  Unchanged: {}", diff.unchanged.len()),
    ];

    push_preview(&mut out, "Added terms:", &diff.added, preview);
    push_preview(&mut out, "Modified terms:", &diff.modified, preview);
    push_preview(&mut out, "Removed terms:", &diff.removed, preview);

    out.push(String::new());
    out.push(rule());
    out.push(
        if diff.is_in_sync() {
            "Glossaries already in sync"
        } else {
            "Sync completed"
        }
        .to_string(),
    );
    out.push(rule());
    out.join("\n")
}

/// Read-only comparison of a markup glossary with a JSON glossary.
pub fn diff_report(
    markup: &Path,
    json: &Path,
    output_name: &str,
    markup_terms: usize,
    json_terms: usize,
    diff: &DiffResult,
) -> String {
    let mut out = vec![
        rule(),
        "DIFFERENCE ANALYSIS (READ ONLY)".to_string(),
        rule(),
        format!("Markup file: {}", file_name(markup)),
        format!("JSON input: {}", file_name(json)),
        format!("JSON output: {output_name}"),
        format!("Markup terms: {markup_terms}"),
        format!("JSON terms: {json_terms}"),
        rule(),
        String::new(),
        "Differences:".to_string(),
        format!("  To add: {}", diff.added.len()),
        format!("  To modify: {}", diff.modified.len()),
        format!("  To remove: {}", diff.removed.len()),
    ];

    push_preview(&mut out, "New terms (not in JSON):", &diff.added, ANALYSIS_PREVIEW);
    push_preview(&mut out, "Modified terms:", &diff.modified, ANALYSIS_PREVIEW);
    push_preview(&mut out, "Terms to remove (not in markup):", &diff.removed, ANALYSIS_PREVIEW);

    out.push(String::new());
    out.push(rule());
    out.push(format!("Analysis only. Run `sync` to create or update '{output_name}'."));
    out.push(rule());
    out.join("\n")
}

/// Cut a line to the excerpt width, ending it with "..." when cut.
pub fn excerpt(line: &str) -> String {
    let line = line.trim();
    if line.chars().count() <= EXCERPT_WIDTH {
        return line.to_string();
    }
    let kept: String = line.chars().take(EXCERPT_WIDTH - 3).collect();
    format!("{kept}...")
}

/// Per-file scan results followed by totals.
pub fn scan_report(term_count: usize, scans: &[FileScan]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "SCAN COMPLETED");
    let _ = writeln!(out, "Glossary terms: {term_count}");
    let _ = writeln!(out, "Files scanned: {}", scans.len());
    let _ = writeln!(out, "{}", "=".repeat(70));

    let with_issues: Vec<&FileScan> = scans
        .iter()
        .filter(|scan| !scan.outcome.is_clean() || !scan.outcome.not_found.is_empty())
        .collect();
    if with_issues.iter().all(|scan| scan.outcome.is_clean()) {
        let _ = writeln!(out);
        let _ = writeln!(out, "Every glossary term found in the documents carries its marker.");
    }

    let mut total_not_found = 0;
    let mut total_missing = 0;
    for scan in &with_issues {
        let outcome = &scan.outcome;
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", file_name(&scan.path));
        let _ = writeln!(out, "   Path: {}", scan.path.display());
        if !outcome.not_found.is_empty() {
            total_not_found += outcome.not_found.len();
            let _ = writeln!(out, "   Terms not in the document: {}", outcome.not_found.len());
        }
        if !outcome.missing.is_empty() {
            let count = outcome.missing_occurrences();
            total_missing += count;
            let _ = writeln!(
                out,
                "   Terms present without marker: {} terms ({count} occurrences)",
                outcome.missing.len()
            );
            for missing in &outcome.missing {
                let _ = writeln!(out, "      - {}:", missing.term);
                for occurrence in &missing.occurrences {
                    let _ = writeln!(out, "        line {:4}: {}", occurrence.line, excerpt(&occurrence.line_text));
                }
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "=".repeat(70));
    let _ = writeln!(out, "TOTALS:");
    let problems = scans.iter().filter(|scan| !scan.outcome.is_clean()).count();
    let _ = writeln!(out, "   Files with missing markers: {problems}/{}", scans.len());
    let _ = writeln!(out, "   Terms not present: {total_not_found}");
    let _ = write!(out, "   Occurrences without marker: {total_missing}");
    out
}
