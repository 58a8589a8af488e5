//! Source file reading and writing
//!
//! Files are read as UTF-8; on a decode failure a single legacy fallback (Latin-1)
//! is attempted. Writes are always UTF-8.

use crate::glossary::error::{GlossaryError, GlossaryResult};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Decode bytes as UTF-8, falling back to Latin-1.
///
/// Returns the text and whether the fallback was used.
pub fn decode(bytes: Vec<u8>) -> (String, bool) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(err) => {
            let text = err.into_bytes().iter().map(|&b| b as char).collect();
            (text, true)
        }
    }
}

/// Read a text file with the UTF-8 → Latin-1 fallback.
pub fn read_source(path: impl AsRef<Path>) -> GlossaryResult<String> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| GlossaryError::io(path, e))?;
    let (text, fallback) = decode(bytes);
    if fallback {
        warn!(path = %path.display(), "not valid UTF-8, decoded as Latin-1");
    } else {
        debug!(path = %path.display(), bytes = text.len(), "read source");
    }
    Ok(text)
}

/// Write UTF-8 text, replacing the destination.
pub fn write_source(path: impl AsRef<Path>, text: &str) -> GlossaryResult<()> {
    let path = path.as_ref();
    fs::write(path, text).map_err(|e| GlossaryError::io(path, e))?;
    debug!(path = %path.display(), bytes = text.len(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_is_read_verbatim() {
        let (text, fallback) = decode("perché".as_bytes().to_vec());
        assert_eq!(text, "perché");
        assert!(!fallback);
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        // "perch\xe9" is "perché" in Latin-1
        let (text, fallback) = decode(b"perch\xe9".to_vec());
        assert_eq!(text, "perché");
        assert!(fallback);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_source("/definitely/not/here.tex").unwrap_err();
        assert!(matches!(err, GlossaryError::MissingFile(_)));
    }
}
