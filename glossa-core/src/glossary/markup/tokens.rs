//! Markup boundary tokenizer
//!
//! Finds the structural markers of a glossary document in one pass. Only the markers
//! matter; everything between them is left to the consumers as raw spans.

use crate::glossary::markup::clean::clean_text;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Lazy-compiled regex for every marker the walk cares about.
///
/// Sectioning commands are matched up to their opening brace; the title is then read
/// with brace balancing so nested commands in titles survive.
static BOUNDARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\\(?P<level>section|subsection)\*?\s*\{|\\(?:newpage|clearpage|pagebreak)\b|\\end\{document\}",
    )
    .unwrap()
});

/// A structural marker found in the markup source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupToken {
    Section { title: String, range: Range<usize> },
    Subsection { title: String, range: Range<usize> },
    PageBreak { range: Range<usize> },
    DocumentEnd { range: Range<usize> },
}

impl MarkupToken {
    pub fn range(&self) -> &Range<usize> {
        match self {
            MarkupToken::Section { range, .. }
            | MarkupToken::Subsection { range, .. }
            | MarkupToken::PageBreak { range }
            | MarkupToken::DocumentEnd { range } => range,
        }
    }

    pub fn start(&self) -> usize {
        self.range().start
    }

    pub fn end(&self) -> usize {
        self.range().end
    }

    /// True for a `\section` whose title is a single character.
    pub fn is_letter_section(&self) -> bool {
        match self {
            MarkupToken::Section { title, .. } => is_letter_title(title),
            _ => false,
        }
    }

    /// True for markers that close a whole section span.
    pub fn closes_section(&self) -> bool {
        matches!(
            self,
            MarkupToken::Section { .. } | MarkupToken::DocumentEnd { .. }
        )
    }
}

/// Whether a section title names a letter group.
///
/// Any single character counts once escapes are resolved, so terms starting with
/// punctuation (`.NET`, `#tag`) keep a group of their own.
pub fn is_letter_title(title: &str) -> bool {
    let cleaned = clean_text(title);
    let mut chars = cleaned.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_whitespace())
}

/// Tokenize markup source into boundary markers, in source order.
///
/// Markers on a commented-out line (after an unescaped `%`) are skipped, as are
/// sectioning commands whose title brace is never closed.
pub fn tokenize(source: &str) -> Vec<MarkupToken> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    for caps in BOUNDARY_REGEX.captures_iter(source) {
        let whole = caps.get(0).expect("group 0 always matches");
        if whole.start() < cursor || is_commented(source, whole.start()) {
            continue;
        }

        let token = match caps.name("level") {
            Some(level) => {
                let Some(close) = matching_brace(source, whole.end()) else {
                    continue;
                };
                let title = source[whole.end()..close].to_string();
                let range = whole.start()..close + 1;
                if level.as_str() == "section" {
                    MarkupToken::Section { title, range }
                } else {
                    MarkupToken::Subsection { title, range }
                }
            }
            None if whole.as_str().starts_with("\\end") => MarkupToken::DocumentEnd {
                range: whole.range(),
            },
            None => MarkupToken::PageBreak {
                range: whole.range(),
            },
        };

        cursor = token.end();
        tokens.push(token);
    }

    tokens
}

/// Find the byte offset of the `}` closing a group whose content starts at `open_end`.
fn matching_brace(source: &str, open_end: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut escaped = false;
    for (offset, ch) in source[open_end..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open_end + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Byte offset (within `line`) of the first unescaped `%`, if any.
pub(crate) fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut backslashes = 0usize;
    for (idx, &byte) in bytes.iter().enumerate() {
        match byte {
            b'\\' => backslashes += 1,
            b'%' if backslashes % 2 == 0 => return Some(idx),
            _ => backslashes = 0,
        }
    }
    None
}

fn is_commented(source: &str, pos: usize) -> bool {
    let line_start = source[..pos].rfind('\n').map_or(0, |idx| idx + 1);
    comment_start(&source[line_start..pos]).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_all_marker_kinds_in_order() {
        let source = "\\section{A}\n\\subsection{API}\nbody\n\\newpage\n\\end{document}\n";
        let tokens = tokenize(source);
        assert_eq!(tokens.len(), 4);
        assert!(matches!(&tokens[0], MarkupToken::Section { title, .. } if title == "A"));
        assert!(matches!(&tokens[1], MarkupToken::Subsection { title, .. } if title == "API"));
        assert!(matches!(tokens[2], MarkupToken::PageBreak { .. }));
        assert!(matches!(tokens[3], MarkupToken::DocumentEnd { .. }));
    }

    #[test]
    fn titles_keep_nested_braces() {
        let tokens = tokenize("\\subsection{\\textbf{Git}flow}");
        assert!(
            matches!(&tokens[0], MarkupToken::Subsection { title, .. } if title == "\\textbf{Git}flow")
        );
        assert_eq!(tokens[0].end(), "\\subsection{\\textbf{Git}flow}".len());
    }

    #[test]
    fn starred_sections_are_recognized() {
        let tokens = tokenize("\\section*{B}");
        assert!(tokens[0].is_letter_section());
    }

    #[test]
    fn commented_markers_are_skipped() {
        let source = "% \\subsection{Old}\ntext \\% not a comment \\subsection{New}";
        let tokens = tokenize(source);
        assert_eq!(tokens.len(), 1);
        assert!(matches!(&tokens[0], MarkupToken::Subsection { title, .. } if title == "New"));
    }

    #[test]
    fn unterminated_title_is_ignored() {
        assert!(tokenize("\\subsection{broken").is_empty());
    }

    #[test]
    fn newpage_prefix_of_longer_command_is_not_a_break() {
        assert!(tokenize("\\newpagestyle{x}").is_empty());
    }

    #[test]
    fn letter_titles() {
        assert!(is_letter_title("A"));
        assert!(is_letter_title(" z "));
        assert!(is_letter_title("9"));
        assert!(is_letter_title("."));
        assert!(is_letter_title("\\#"));
        assert!(is_letter_title("\\%"));
        assert!(!is_letter_title("\\G"));
        assert!(!is_letter_title("Introduzione"));
        assert!(!is_letter_title(""));
    }

    #[test]
    fn comment_start_respects_escapes() {
        assert_eq!(comment_start("50\\% done % note"), Some(10));
        assert_eq!(comment_start("\\\\% after linebreak"), Some(2));
        assert_eq!(comment_start("no comment"), None);
    }
}
