//! Writer, markup direction
//!
//! Regenerates the letter-sections of a glossary document from a TermStore and splices
//! them into an existing document between the introduction and `\end{document}`.

use crate::glossary::error::{GlossaryError, GlossaryResult};
use crate::glossary::markup::clean::clean_text;
use crate::glossary::markup::tokens::{tokenize, MarkupToken};
use crate::glossary::store::{Term, TermStore};
use std::collections::BTreeMap;
use tracing::debug;

/// Escape the characters LaTeX reserves in running text.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '&' | '%' | '$' | '#') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Group label for a term: its first character, uppercased.
pub fn section_letter(name: &str) -> String {
    name.chars()
        .next()
        .and_then(|ch| ch.to_uppercase().next())
        .map(String::from)
        .unwrap_or_default()
}

/// Render every term as letter-sections, letters ascending, terms alphabetical.
pub fn render_sections(store: &TermStore) -> String {
    let mut groups: BTreeMap<String, Vec<&Term>> = BTreeMap::new();
    for term in store {
        groups
            .entry(section_letter(&term.name))
            .or_default()
            .push(term);
    }

    let mut parts = Vec::new();
    for (letter, terms) in &groups {
        parts.push(format!("\\newpage\n\n\\section{{{}}}\n", escape(letter)));
        for term in terms {
            parts.push(format!("\n\\subsection{{{}}}", escape(&term.name)));
            parts.push(format!("{}\n", escape(&term.definition)));
        }
    }
    parts.join("\n")
}

/// Replace the letter-sections of `document` with freshly rendered ones.
///
/// The rewritten region starts at the first letter-section following the section titled
/// `intro_title` (including a `\newpage` right before it) and ends at `\end{document}`.
/// When the document has no letter-section yet, the sections are inserted right before
/// `\end{document}`. Both anchors are required; nothing is rewritten if either is missing.
pub fn splice_sections(
    document: &str,
    store: &TermStore,
    intro_title: &str,
) -> GlossaryResult<String> {
    let tokens = tokenize(document);

    let intro_idx = tokens
        .iter()
        .position(|token| match token {
            MarkupToken::Section { title, .. } => {
                clean_text(title).eq_ignore_ascii_case(intro_title)
            }
            _ => false,
        })
        .ok_or_else(|| GlossaryError::MissingAnchor(format!("\\section{{{}}}", intro_title)))?;

    let end_idx = tokens[intro_idx..]
        .iter()
        .position(|token| matches!(token, MarkupToken::DocumentEnd { .. }))
        .map(|offset| intro_idx + offset)
        .ok_or_else(|| GlossaryError::MissingAnchor("\\end{document}".to_string()))?;

    let region_start = tokens[intro_idx..end_idx]
        .iter()
        .enumerate()
        .find(|(_, token)| token.is_letter_section())
        .map(|(offset, token)| {
            let idx = intro_idx + offset;
            match idx.checked_sub(1).map(|prev| &tokens[prev]) {
                Some(prev)
                    if matches!(prev, MarkupToken::PageBreak { .. })
                        && document[prev.end()..token.start()].trim().is_empty() =>
                {
                    prev.start()
                }
                _ => token.start(),
            }
        })
        .unwrap_or_else(|| tokens[end_idx].start());

    let head = document[..region_start].trim_end();
    let tail = &document[tokens[end_idx].start()..];
    let sections = render_sections(store);

    debug!(terms = store.len(), "spliced letter-sections into document");
    Ok(format!("{head}\n\n{sections}\n{tail}"))
}
