//! # glossa
//!
//! Keeps a glossary consistent between its two representations: a LaTeX document
//! (one `\section{X}` per initial letter, one `\subsection{Term}` per term) and a flat
//! JSON record (`{"terms": [{"term": .., "definition": ..}]}`).
//!
//! File Layout
//!
//! src/glossary
//!   ├── store        The case-insensitive term store shared by every pipeline
//!   ├── markup       Tokenizer, extractor, renderer and sorter for the LaTeX side
//!   ├── encoding     UTF-8 reads with a Latin-1 fallback
//!   ├── json         Loader (three tolerated shapes) and canonical writer
//!   ├── loader       Format detection, one entry point for either representation
//!   ├── diff         Old/new store comparison
//!   ├── variants     Search forms derived from a single term
//!   ├── scanning     Occurrence scanner with exclusion zones and marker detection
//!   ├── annotate     Marker insertion built on top of the scanner
//!   ├── report       Plain-text sync, analysis and scan reports
//!   ├── sync         The markup → JSON pipeline and its explicit context
//!   ├── progress     Progress sinks shared by the pipelines
//!   ├── worker       Single background worker with progress events
//!   └── testing      Fixture helpers for tests
//!
//! The two pipelines (sync and scan/annotate) share only the store shape and the
//! markup tokenizer.

pub mod glossary;
