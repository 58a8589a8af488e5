//! Variant matching
//!
//! Compiles one variant into a regex and filters raw hits by word boundaries. The
//! boundary check is done by hand instead of `\b`, because terms may start or end
//! with punctuation (`C++`, `d'appalto`) where `\b` would never match.

use crate::glossary::variants::is_acronym;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::ops::Range;

static WHITESPACE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// A compiled search form.
#[derive(Debug, Clone)]
pub struct VariantMatcher {
    variant: String,
    regex: Regex,
    acronym: bool,
}

impl VariantMatcher {
    pub fn new(variant: &str) -> Result<Self, regex::Error> {
        let variant = variant.trim();
        let acronym = is_acronym(variant);
        let regex = RegexBuilder::new(&variant_pattern(variant))
            .case_insensitive(!acronym)
            .build()?;
        Ok(Self {
            variant: variant.to_string(),
            regex,
            acronym,
        })
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn is_acronym(&self) -> bool {
        self.acronym
    }

    /// Every accepted match of the variant in `text`, in order.
    pub fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        let mut found = Vec::new();
        if self.variant.is_empty() {
            return found;
        }

        let mut cursor = 0;
        while cursor <= text.len() {
            let Some(hit) = self.regex.find_at(text, cursor) else {
                break;
            };
            if self.accepts(text, hit.range()) {
                found.push(hit.range());
                cursor = hit.end().max(hit.start() + 1);
            } else {
                cursor = next_char_boundary(text, hit.start());
            }
        }
        found
    }

    fn accepts(&self, text: &str, range: Range<usize>) -> bool {
        if range.is_empty() {
            return false;
        }
        let before = text[..range.start].chars().next_back();
        let after = text[range.end..].chars().next();

        if before == Some('\\') {
            return false;
        }

        let blocks = |c: char| {
            if self.acronym {
                c.is_alphabetic()
            } else {
                is_word_char(c)
            }
        };
        !before.is_some_and(blocks) && !after.is_some_and(blocks)
    }
}

/// Regex source for a variant: whitespace runs match any whitespace run and each
/// hyphen matches a hyphen or whitespace.
fn variant_pattern(variant: &str) -> String {
    WHITESPACE_RUN_REGEX
        .split(variant)
        .map(|word| {
            word.split('-')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"(?:-|\s+)")
        })
        .collect::<Vec<_>>()
        .join(r"\s+")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| pos + c.len_utf8())
}
