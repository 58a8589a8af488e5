//! JSON side of the glossary
//!
//! Reading tolerates three layouts and normalizes them into a TermStore:
//!
//! - canonical: `{"terms": [{"term": .., "definition": ..}, ..]}`
//! - a bare mapping: `{"API": "Application Programming Interface", ..}`
//! - a bare list: `[{"term": .., "definition": ..}]` or `[{"name": .., "desc": ..}]`
//!
//! Writing always produces the canonical layout, sorted case-insensitively, under a
//! fixed file name.

use crate::glossary::encoding::{read_source, write_source};
use crate::glossary::error::{GlossaryError, GlossaryResult};
use crate::glossary::store::{Term, TermStore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name every written glossary JSON ends up with.
pub const DEFAULT_JSON_FILE_NAME: &str = "glossario.json";

#[derive(Debug, Deserialize)]
struct LooseEntry {
    #[serde(alias = "name")]
    term: Option<String>,
    #[serde(alias = "desc")]
    definition: Option<String>,
}

#[derive(Debug, Serialize)]
struct CanonicalDocument<'a> {
    terms: Vec<&'a Term>,
}

/// Entries are decoded one at a time; a malformed entry is skipped, never the file.
fn entries_to_store(entries: Vec<Value>) -> TermStore {
    let mut store = TermStore::new();
    let mut skipped = 0usize;
    for item in entries {
        let inserted = match serde_json::from_value::<LooseEntry>(item) {
            Ok(LooseEntry {
                term: Some(term),
                definition: Some(definition),
            }) => store.insert(&term, definition),
            _ => false,
        };
        if !inserted {
            skipped += 1;
        }
    }
    if skipped > 0 {
        debug!(skipped, "skipped incomplete glossary entries");
    }
    store
}

fn mapping_to_store(map: Map<String, Value>) -> TermStore {
    let mut store = TermStore::new();
    let mut skipped = 0usize;
    for (term, definition) in map {
        let inserted = match definition {
            Value::String(definition) => store.insert(&term, definition),
            _ => false,
        };
        if !inserted {
            skipped += 1;
        }
    }
    if skipped > 0 {
        debug!(skipped, "skipped glossary entries without a text definition");
    }
    store
}

/// Parse glossary JSON text. `origin` is only used in error messages.
pub fn parse_glossary(text: &str, origin: &Path) -> GlossaryResult<TermStore> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| GlossaryError::Json {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;

    match value {
        Value::Object(mut map) => match map.remove("terms") {
            Some(Value::Array(entries)) => Ok(entries_to_store(entries)),
            // A term literally named "terms" in a bare mapping.
            Some(definition @ Value::String(_)) => {
                map.insert("terms".to_string(), definition);
                Ok(mapping_to_store(map))
            }
            Some(_) => Err(GlossaryError::UnsupportedShape(origin.to_path_buf())),
            None => Ok(mapping_to_store(map)),
        },
        Value::Array(entries) => Ok(entries_to_store(entries)),
        _ => Err(GlossaryError::UnsupportedShape(origin.to_path_buf())),
    }
}

/// Load a glossary JSON file.
pub fn load_glossary(path: impl AsRef<Path>) -> GlossaryResult<TermStore> {
    let path = path.as_ref();
    let text = read_source(path)?;
    let store = parse_glossary(&text, path)?;
    debug!(path = %path.display(), terms = store.len(), "loaded JSON glossary");
    Ok(store)
}

/// Load a glossary JSON file, treating a missing file as an empty glossary.
pub fn load_glossary_or_empty(path: impl AsRef<Path>) -> GlossaryResult<TermStore> {
    match load_glossary(path.as_ref()) {
        Err(GlossaryError::MissingFile(missing)) => {
            info!(path = %missing.display(), "JSON glossary not found, starting empty");
            Ok(TermStore::new())
        }
        other => other,
    }
}

/// Serialize a store into canonical, sorted JSON.
pub fn to_json_string(store: &TermStore) -> String {
    let document = CanonicalDocument {
        terms: store.iter().collect(),
    };
    serde_json::to_string_pretty(&document).expect("string-only document always serializes")
}

/// Where a JSON glossary will actually be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonTarget {
    /// Path the caller asked for.
    pub requested: PathBuf,
    /// Path that will be written, always named with the fixed file name.
    pub path: PathBuf,
    /// True when the file name was rewritten.
    pub coerced: bool,
}

/// Force the output file name to `file_name`, keeping the requested directory.
pub fn coerce_json_path(requested: impl AsRef<Path>, file_name: &str) -> JsonTarget {
    let requested = requested.as_ref().to_path_buf();
    let already = requested
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.eq_ignore_ascii_case(file_name));

    if already {
        return JsonTarget {
            path: requested.clone(),
            requested,
            coerced: false,
        };
    }

    let directory = requested
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    JsonTarget {
        path: directory.join(file_name),
        requested,
        coerced: true,
    }
}

/// Path of the backup copy made before overwriting `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Copy an existing file to its `.bak` sibling. Returns the backup path when a copy was made.
pub fn backup_existing(path: &Path) -> GlossaryResult<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let backup = backup_path(path);
    fs::copy(path, &backup).map_err(|e| GlossaryError::io(&backup, e))?;
    info!(backup = %backup.display(), "backed up previous JSON glossary");
    Ok(Some(backup))
}

/// Write a store as canonical JSON to the coerced target.
pub fn write_glossary(target: &JsonTarget, store: &TermStore) -> GlossaryResult<()> {
    if target.coerced {
        warn!(
            requested = %target.requested.display(),
            written = %target.path.display(),
            "output file name rewritten"
        );
    }
    write_source(&target.path, &to_json_string(store))
}
