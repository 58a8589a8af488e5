//! Error types for glossary operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the glossary pipelines.
///
/// Every variant aborts the operation that raised it; nothing is retried and no
/// destination file is written after one of these is returned.
#[derive(Error, Debug)]
pub enum GlossaryError {
    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required input file does not exist
    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// The JSON glossary could not be parsed
    #[error("Malformed JSON in {}: {message}", path.display())]
    Json { path: PathBuf, message: String },

    /// The JSON parsed but matches none of the accepted glossary shapes
    #[error("Unrecognized glossary layout in {}", .0.display())]
    UnsupportedShape(PathBuf),

    /// The markup document lacks a structural marker the operation relies on
    #[error("Cannot locate expected anchor {0}")]
    MissingAnchor(String),

    /// The glossary file extension is neither markup nor JSON
    #[error("Unsupported glossary format: {} (use .tex, .latex or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The background worker stopped without reporting a result
    #[error("Background worker stopped unexpectedly")]
    WorkerLost,
}

impl GlossaryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            GlossaryError::MissingFile(path)
        } else {
            GlossaryError::Io { path, source }
        }
    }
}

pub type GlossaryResult<T> = Result<T, GlossaryError>;
