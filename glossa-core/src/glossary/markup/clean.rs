//! Text cleaning for subsection titles and bodies
//!
//! Collapses the formatting commands a glossary author typically uses down to plain
//! text. Anything not listed here is left untouched.

use crate::glossary::markup::tokens::comment_start;
use once_cell::sync::Lazy;
use regex::Regex;

/// Inline emphasis wrappers that collapse to their content. The inner class excludes
/// braces so the innermost wrapper is rewritten first.
static FORMATTING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(?:textbf|textit|texttt|emph)\{([^{}]*)\}").unwrap());

static PAGE_CONTROL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:newpage|pagebreak|clearpage)\b|\\[vh]space\*?\{[^}]*\}").unwrap()
});

static EMPTY_COMMAND_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\[a-zA-Z]+\{\}").unwrap());

static ESCAPED_RESERVED_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\([&%$#])").unwrap());

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Drop everything from an unescaped `%` to the end of its line.
pub fn strip_comments(text: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| match comment_start(line) {
            Some(idx) if line.ends_with('\n') => format!("{}\n", &line[..idx]),
            Some(idx) => line[..idx].to_string(),
            None => line.to_string(),
        })
        .collect()
}

/// Clean a raw title or body into single-line plain text.
pub fn clean_text(raw: &str) -> String {
    let mut text = strip_comments(raw);

    loop {
        let next = FORMATTING_REGEX.replace_all(&text, "$1").into_owned();
        if next == text {
            break;
        }
        text = next;
    }

    let text = PAGE_CONTROL_REGEX.replace_all(&text, "");
    let text = EMPTY_COMMAND_REGEX.replace_all(&text, "");
    let text = ESCAPED_RESERVED_REGEX.replace_all(&text, "$1");
    let text = WHITESPACE_REGEX.replace_all(&text, " ");
    text.trim().to_string()
}
