//! Annotation marker detection
//!
//! A term occurrence is annotated when a marker follows it. Two spellings are in use
//! and are equivalent: the short macro `\G` and its expanded form.

use once_cell::sync::Lazy;
use regex::Regex;

/// Short marker macro, also the spelling inserted by the annotator.
pub const SHORT_MARKER: &str = "\\G";

/// Expanded marker spelling.
pub const EXPANDED_MARKER: &str = "\\textsubscript{\\scalebox{0.6}{\\textbf{G}}}";

/// Whitespace skipped between a term and its marker.
const MAX_WHITESPACE_SKIP: usize = 100;

static PARENTHETICAL_ACRONYM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\s*[A-Z]{2,}\s*\)").unwrap());

/// The recognized marker spellings plus the lookahead policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    spellings: Vec<String>,
    punctuation_window: usize,
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::new(SHORT_MARKER, [EXPANDED_MARKER], 3)
    }
}

impl MarkerSet {
    /// `primary` is the spelling inserted by the annotator; all spellings are recognized.
    pub fn new<I, S>(primary: &str, alternates: I, punctuation_window: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spellings = vec![primary.to_string()];
        for alternate in alternates {
            let alternate = alternate.into();
            if !alternate.is_empty() && !spellings.contains(&alternate) {
                spellings.push(alternate);
            }
        }
        Self {
            spellings,
            punctuation_window,
        }
    }

    pub fn primary(&self) -> &str {
        &self.spellings[0]
    }

    pub fn spellings(&self) -> &[String] {
        &self.spellings
    }

    /// Length of the marker starting exactly at `pos`, if any.
    ///
    /// A spelling ending in a letter must not run into another letter, so `\G` does not
    /// match the start of `\Gamma`.
    pub fn marker_at(&self, text: &str, pos: usize) -> Option<usize> {
        let rest = text.get(pos..)?;
        self.spellings.iter().find_map(|spelling| {
            if !rest.starts_with(spelling.as_str()) {
                return None;
            }
            let ends_in_letter = spelling.chars().last().is_some_and(|c| c.is_alphabetic());
            let runs_on = rest[spelling.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphabetic());
            (!(ends_in_letter && runs_on)).then_some(spelling.len())
        })
    }

    /// Whether the occurrence ending at `end` is already followed by a marker.
    ///
    /// Looks past whitespace, then past up to `punctuation_window` closing characters
    /// (`}` `)` `]` quotes), then past a parenthetical acronym such as ` (RTB)`.
    pub fn is_marked_after(&self, text: &str, end: usize) -> bool {
        let pos = skip_whitespace(text, end);
        if self.marker_at(text, pos).is_some() {
            return true;
        }

        let mut cursor = pos;
        for _ in 0..self.punctuation_window {
            match text[cursor..].chars().next() {
                Some(ch @ ('}' | ')' | ']' | '\'' | '"')) => {
                    cursor = skip_whitespace(text, cursor + ch.len_utf8());
                    if self.marker_at(text, cursor).is_some() {
                        return true;
                    }
                }
                _ => break,
            }
        }

        parenthetical_acronym_end(text, pos)
            .is_some_and(|after| self.marker_at(text, skip_whitespace(text, after)).is_some())
    }
}

/// Skip whitespace after `pos`, at most a fixed number of characters.
pub fn skip_whitespace(text: &str, pos: usize) -> usize {
    let mut cursor = pos;
    for ch in text[pos..].chars().take(MAX_WHITESPACE_SKIP) {
        if !ch.is_whitespace() {
            break;
        }
        cursor += ch.len_utf8();
    }
    cursor
}

/// End offset of a `(ACRONYM)` group starting exactly at `pos`.
pub fn parenthetical_acronym_end(text: &str, pos: usize) -> Option<usize> {
    PARENTHETICAL_ACRONYM_REGEX
        .find(text.get(pos..)?)
        .map(|m| pos + m.end())
}
