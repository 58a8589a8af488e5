//! LaTeX side of the glossary
//!
//! The glossary document is a sequence of letter-sections (`\section{A}`), each holding
//! one `\subsection{Term}` per term whose body is the definition. Everything here works
//! off the boundary tokens produced by [`tokens::tokenize`]:
//!
//! - [`extract`] walks the tokens with an explicit state machine to build a `TermStore`
//! - [`render`] regenerates letter-sections from a store and splices them into a document
//! - [`sort`] alphabetizes an existing document in place, reporting duplicate titles
//! - [`clean`] strips formatting commands from titles and bodies

pub mod clean;
pub mod extract;
pub mod render;
pub mod sort;
pub mod tokens;

pub use extract::{extract_terms, term_names};
pub use render::{escape, render_sections, splice_sections};
pub use sort::{sort_markup, SortedMarkup};
pub use tokens::{tokenize, MarkupToken};
