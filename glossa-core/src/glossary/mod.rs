//! Main module for glossa library functionality

pub mod annotate;
pub mod diff;
pub mod encoding;
pub mod error;
pub mod json;
pub mod loader;
pub mod markup;
pub mod progress;
pub mod report;
pub mod scanning;
pub mod store;
pub mod sync;
pub mod testing;
pub mod variants;
pub mod worker;

pub use error::{GlossaryError, GlossaryResult};
pub use store::{Term, TermStore};
