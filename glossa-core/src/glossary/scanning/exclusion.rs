//! Exclusion zones
//!
//! Byte ranges of a document in which term occurrences are never reported: arguments
//! of path-bearing commands, literal URLs and absolute file paths.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Commands whose first braced argument is a path, key or URL.
pub const DEFAULT_PATH_COMMANDS: &[&str] = &[
    "input",
    "include",
    "includegraphics",
    "url",
    "href",
    "label",
    "ref",
    "cite",
    "bibliography",
    "lstinputlisting",
    "subfile",
    "import",
];

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:https?|ftp)://[^\s{}]+|www\.[^\s{}]+").unwrap());

static UNIX_PATH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|[\s(\[{"'=])(/[\w.\-]+(?:/[\w.\-]+)+/?)"#).unwrap()
});

static WINDOWS_PATH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z]:[\\/][^\s{}]*").unwrap());

/// Which zones to compute.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    command_regex: Option<Regex>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self::new(DEFAULT_PATH_COMMANDS.iter().copied())
    }
}

impl ExclusionRules {
    /// Build the rules for a list of command names (without backslash).
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = commands
            .into_iter()
            .map(|c| regex::escape(c.as_ref().trim().trim_start_matches('\\')))
            .filter(|c| !c.is_empty())
            .collect();
        let command_regex = (!names.is_empty()).then(|| {
            let pattern = format!(r"\\(?:{})\*?(?:\s*\[[^\]]*\])?\s*\{{", names.join("|"));
            Regex::new(&pattern).expect("escaped command names form a valid pattern")
        });
        Self { command_regex }
    }

    /// Compute the merged exclusion zones of `text`.
    pub fn zones(&self, text: &str) -> ExclusionZones {
        let mut spans: Vec<Range<usize>> = Vec::new();

        if let Some(regex) = &self.command_regex {
            for found in regex.find_iter(text) {
                let open = found.end() - 1;
                let close = closing_brace(text, open).unwrap_or(text.len());
                spans.push(open..close);
            }
        }

        spans.extend(URL_REGEX.find_iter(text).map(|m| m.range()));
        spans.extend(
            UNIX_PATH_REGEX
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.range()),
        );
        spans.extend(WINDOWS_PATH_REGEX.find_iter(text).map(|m| m.range()));

        ExclusionZones::from_spans(spans)
    }
}

/// Byte offset just past the `}` balancing the `{` at `open`.
fn closing_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (offset, ch) in text[open..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Sorted, non-overlapping spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionZones {
    spans: Vec<Range<usize>>,
}

impl ExclusionZones {
    pub fn from_spans(mut spans: Vec<Range<usize>>) -> Self {
        spans.retain(|s| s.start < s.end);
        spans.sort_by_key(|s| s.start);
        let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
        for span in spans {
            match merged.last_mut() {
                Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
                _ => merged.push(span),
            }
        }
        Self { spans: merged }
    }

    /// Whether `range` touches any zone.
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        let index = self.spans.partition_point(|s| s.end <= range.start);
        self.spans
            .get(index)
            .is_some_and(|span| span.start < range.end)
    }

    pub fn spans(&self) -> &[Range<usize>] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}
