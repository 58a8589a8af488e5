//! Alphabetical reordering of an existing glossary document
//!
//! Letter-sections are reordered by letter and the subsections inside each one by
//! title, case-insensitively. Subsection text moves verbatim, so formatting and
//! comments inside a definition are preserved. Text before the first letter-section
//! and after the last one stays where it is.

use crate::glossary::markup::clean::clean_text;
use crate::glossary::markup::tokens::{tokenize, MarkupToken};
use crate::glossary::store::fold_key;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Result of [`sort_markup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedMarkup {
    pub text: String,
    /// Number of letter-sections found and reordered.
    pub sections: usize,
    /// Titles appearing more than once (case-insensitively), with their count.
    pub duplicates: Vec<(String, usize)>,
}

struct SectionSpan<'a> {
    letter: String,
    start: usize,
    end: usize,
    subsections: Vec<&'a MarkupToken>,
    body_end: usize,
}

fn title_key(token: &MarkupToken) -> String {
    match token {
        MarkupToken::Subsection { title, .. } | MarkupToken::Section { title, .. } => {
            fold_key(&clean_text(title))
        }
        _ => String::new(),
    }
}

fn collect_sections<'a>(source: &str, tokens: &'a [MarkupToken]) -> Vec<SectionSpan<'a>> {
    let mut spans = Vec::new();
    for (idx, token) in tokens.iter().enumerate() {
        let MarkupToken::Section { title, .. } = token else {
            continue;
        };
        if !token.is_letter_section() {
            continue;
        }

        let rest = &tokens[idx + 1..];
        let closing = rest.iter().position(MarkupToken::closes_section);
        let inner = &rest[..closing.unwrap_or(rest.len())];
        let end = closing.map_or(source.len(), |offset| rest[offset].start());

        let subsections: Vec<&MarkupToken> = inner
            .iter()
            .filter(|t| matches!(t, MarkupToken::Subsection { .. }))
            .collect();
        // Only page breaks trailing the last definition stay behind; text continued
        // after a break belongs to that definition and moves with it.
        let mut body_end = end;
        if let Some(last) = subsections.last() {
            for page_break in inner.iter().rev().filter(|t| {
                matches!(t, MarkupToken::PageBreak { .. }) && t.start() > last.start()
            }) {
                if !source[page_break.end()..body_end].trim().is_empty() {
                    break;
                }
                body_end = page_break.start();
            }
        }

        spans.push(SectionSpan {
            letter: clean_text(title).to_uppercase(),
            start: token.start(),
            end,
            subsections,
            body_end,
        });
    }
    spans
}

fn render_section(source: &str, span: &SectionSpan<'_>) -> String {
    let Some(first) = span.subsections.first() else {
        return source[span.start..span.end].to_string();
    };

    let mut chunks: Vec<(String, String)> = span
        .subsections
        .iter()
        .enumerate()
        .map(|(k, sub)| {
            let chunk_end = span
                .subsections
                .get(k + 1)
                .map_or(span.body_end, |next| next.start());
            let text = format!("{}\n\n", source[sub.start()..chunk_end].trim_end());
            (title_key(sub), text)
        })
        .collect();
    chunks.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = format!("{}\n\n", source[span.start..first.start()].trim_end());
    for (_, text) in chunks {
        out.push_str(&text);
    }
    out.push_str(&source[span.body_end..span.end]);
    out
}

fn find_duplicates(spans: &[SectionSpan<'_>]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, (String, usize)> = BTreeMap::new();
    for sub in spans.iter().flat_map(|span| span.subsections.iter()) {
        if let MarkupToken::Subsection { title, .. } = sub {
            let name = clean_text(title);
            counts
                .entry(fold_key(&name))
                .or_insert_with(|| (name, 0))
                .1 += 1;
        }
    }
    counts
        .into_values()
        .filter(|(_, count)| *count > 1)
        .collect()
}

/// Reorder letter-sections and their subsections alphabetically.
///
/// Non-letter sections found between letter-sections are moved after the sorted block.
/// A document without letter-sections is returned unchanged.
pub fn sort_markup(source: &str) -> SortedMarkup {
    let tokens = tokenize(source);
    let mut spans = collect_sections(source, &tokens);

    let (Some(first_start), Some(last_end)) =
        (spans.first().map(|s| s.start), spans.last().map(|s| s.end))
    else {
        warn!("no letter-sections found, document left unchanged");
        return SortedMarkup {
            text: source.to_string(),
            sections: 0,
            duplicates: Vec::new(),
        };
    };

    let gaps: Vec<&str> = spans
        .windows(2)
        .map(|pair| &source[pair[0].end..pair[1].start])
        .filter(|gap| !gap.trim().is_empty())
        .collect();

    let duplicates = find_duplicates(&spans);
    spans.sort_by(|a, b| a.letter.cmp(&b.letter));

    let mut text = source[..first_start].to_string();
    for span in &spans {
        text.push_str(&render_section(source, span));
    }
    for gap in gaps {
        text.push_str(gap);
    }
    text.push_str(&source[last_end..]);

    debug!(
        sections = spans.len(),
        duplicates = duplicates.len(),
        "sorted markup"
    );
    SortedMarkup {
        text,
        sections: spans.len(),
        duplicates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glossary::markup::extract::extract_terms;

    const UNSORTED: &str = "\\documentclass{article}\n\\begin{document}\n\\section{B}\n\\subsection{Bug}\nDifetto.\n\\subsection{Backlog}\nElenco.\n\\newpage\n\\section{A}\n\\subsection{API}\nInterfaccia.\n\\subsection{Analisi}\nStudio.\n\\subsection{api}\nDup.\n\\end{document}\n";

    #[test]
    fn sorts_sections_and_subsections() {
        let sorted = sort_markup(UNSORTED);
        let expected = concat!(
            "\\documentclass{article}\n\\begin{document}\n",
            "\\section{A}\n\n",
            "\\subsection{Analisi}\nStudio.\n\n",
            "\\subsection{API}\nInterfaccia.\n\n",
            "\\subsection{api}\nDup.\n\n",
            "\\section{B}\n\n",
            "\\subsection{Backlog}\nElenco.\n\n",
            "\\subsection{Bug}\nDifetto.\n\n",
            "\\newpage\n",
            "\\end{document}\n",
        );
        assert_eq!(sorted.text, expected);
        assert_eq!(sorted.sections, 2);
    }

    #[test]
    fn reports_duplicates_case_insensitively() {
        let sorted = sort_markup(UNSORTED);
        assert_eq!(sorted.duplicates, vec![("API".to_string(), 2)]);
    }

    #[test]
    fn sorting_preserves_extracted_terms() {
        let sorted = sort_markup(UNSORTED);
        assert_eq!(extract_terms(&sorted.text), extract_terms(UNSORTED));
    }

    #[test]
    fn text_after_a_page_break_moves_with_its_definition() {
        let source = "\\section{C}\n\\subsection{Commit}\nSnapshot\n\\newpage\nof changes.\n\\subsection{Branch}\nLine.\n\\newpage\n\\end{document}\n";
        let sorted = sort_markup(source);
        assert_eq!(extract_terms(&sorted.text), extract_terms(source));
        assert_eq!(
            extract_terms(&sorted.text).definition("Commit"),
            Some("Snapshot of changes.")
        );
        assert!(sorted
            .text
            .ends_with("Snapshot\n\\newpage\nof changes.\n\n\\newpage\n\\end{document}\n"));
    }

    #[test]
    fn sorting_is_idempotent() {
        let once = sort_markup(UNSORTED).text;
        assert_eq!(sort_markup(&once).text, once);
    }

    #[test]
    fn document_without_sections_is_unchanged() {
        let sorted = sort_markup("plain text");
        assert_eq!(sorted.text, "plain text");
        assert_eq!(sorted.sections, 0);
        assert!(sorted.duplicates.is_empty());
    }
}
