//! Markup → JSON synchronization
//!
//! A [`SyncContext`] carries both paths and every option through the pipeline; no stage
//! reads global state. The pipeline reports these checkpoints:
//!
//! | percent | stage                     |
//! |---------|---------------------------|
//! | 20      | markup read               |
//! | 40      | terms extracted           |
//! | 60      | JSON glossary loaded      |
//! | 80      | stores compared           |
//! | 90      | JSON written (or skipped) |
//! | 100     | report built              |

use crate::glossary::diff::{diff, CompareMode, DiffResult};
use crate::glossary::encoding::read_source;
use crate::glossary::error::GlossaryResult;
use crate::glossary::json::{
    backup_existing, coerce_json_path, load_glossary_or_empty, write_glossary, JsonTarget,
    DEFAULT_JSON_FILE_NAME,
};
use crate::glossary::markup::extract_terms;
use crate::glossary::progress::ProgressSink;
use crate::glossary::report::{diff_report, sync_report};
use crate::glossary::store::TermStore;
use std::path::PathBuf;
use tracing::info;

/// Options of a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub compare: CompareMode,
    /// Fixed name of the written JSON file.
    pub json_file_name: String,
    /// Copy the previous JSON file to `<name>.bak` before overwriting it.
    pub backup: bool,
    /// Names listed per category in the report.
    pub report_preview: usize,
    /// Compute everything but write nothing.
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            compare: CompareMode::default(),
            json_file_name: DEFAULT_JSON_FILE_NAME.to_string(),
            backup: true,
            report_preview: 10,
            dry_run: false,
        }
    }
}

/// Inputs of one sync run.
#[derive(Debug, Clone)]
pub struct SyncContext {
    pub markup_path: PathBuf,
    pub json_path: PathBuf,
    pub options: SyncOptions,
}

/// What a sync run did.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Terms extracted from the markup; this is what was (or would be) written.
    pub store: TermStore,
    pub diff: DiffResult,
    pub target: JsonTarget,
    pub backup: Option<PathBuf>,
    pub written: bool,
    pub report: String,
}

/// Result of a read-only comparison.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub markup_terms: usize,
    pub json_terms: usize,
    pub diff: DiffResult,
    pub target: JsonTarget,
    pub report: String,
}

impl SyncContext {
    pub fn new(markup_path: impl Into<PathBuf>, json_path: impl Into<PathBuf>, options: SyncOptions) -> Self {
        Self {
            markup_path: markup_path.into(),
            json_path: json_path.into(),
            options,
        }
    }

    /// Where the JSON glossary will be written.
    pub fn target(&self) -> JsonTarget {
        coerce_json_path(&self.json_path, &self.options.json_file_name)
    }

    fn load_both(&self, progress: &dyn ProgressSink) -> GlossaryResult<(TermStore, TermStore)> {
        let source = read_source(&self.markup_path)?;
        progress.report(20.0, "Markup read");

        let extracted = extract_terms(&source);
        progress.report(40.0, &format!("Extracted {} terms", extracted.len()));

        let existing = load_glossary_or_empty(&self.json_path)?;
        progress.report(60.0, &format!("Loaded {} JSON terms", existing.len()));

        Ok((extracted, existing))
    }

    /// Extract, compare, write and report.
    ///
    /// The JSON file is only written when the stores differ or the target file does
    /// not exist yet, so an in-sync run leaves the file (and its backup) untouched.
    pub fn run(&self, progress: &dyn ProgressSink) -> GlossaryResult<SyncOutcome> {
        let (extracted, existing) = self.load_both(progress)?;

        let result = diff(&existing, &extracted, self.options.compare);
        progress.report(80.0, "Glossaries compared");

        let target = self.target();
        let needs_write = !result.is_in_sync() || !target.path.exists();
        let mut backup = None;
        let written = needs_write && !self.options.dry_run;
        if written {
            if self.options.backup {
                backup = backup_existing(&target.path)?;
            }
            write_glossary(&target, &extracted)?;
            info!(path = %target.path.display(), terms = extracted.len(), "JSON glossary written");
            progress.report(90.0, "JSON written");
        } else {
            progress.report(90.0, "Nothing written");
        }

        let report = sync_report(&self.markup_path, &target.path, &result, self.options.report_preview);
        progress.report(100.0, "Report ready");

        Ok(SyncOutcome {
            store: extracted,
            diff: result,
            target,
            backup,
            written,
            report,
        })
    }

    /// Compare without writing anything.
    pub fn analyze(&self, progress: &dyn ProgressSink) -> GlossaryResult<Analysis> {
        let (extracted, existing) = self.load_both(progress)?;
        let result = diff(&existing, &extracted, self.options.compare);
        progress.report(80.0, "Glossaries compared");

        let target = self.target();
        let report = diff_report(
            &self.markup_path,
            &self.json_path,
            &self.options.json_file_name,
            extracted.len(),
            existing.len(),
            &result,
        );
        progress.report(100.0, "Report ready");

        Ok(Analysis {
            markup_terms: extracted.len(),
            json_terms: existing.len(),
            diff: result,
            target,
            report,
        })
    }
}
