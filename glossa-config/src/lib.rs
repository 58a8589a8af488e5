//! Shared configuration loader for the glossa tools.
//!
//! `defaults/glossa.default.toml` is embedded into the binary so that the documented
//! defaults and the runtime behavior stay in sync. Callers layer user files and CLI
//! overrides on top of those defaults via [`Loader`] before deserializing into
//! [`GlossaConfig`], then turn the sections into the option structs of `glossa-core`.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use glossa_core::glossary::annotate::AnnotateOptions;
use glossa_core::glossary::diff::CompareMode;
use glossa_core::glossary::scanning::{ExclusionRules, MarkerSet, ScanOptions};
use glossa_core::glossary::sync::SyncOptions;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TOML: &str = include_str!("../defaults/glossa.default.toml");

/// Top-level configuration consumed by the glossa commands.
#[derive(Debug, Clone, Deserialize)]
pub struct GlossaConfig {
    pub markers: MarkersConfig,
    pub sync: SyncConfig,
    pub markup: MarkupConfig,
    pub scan: ScanConfig,
    pub annotate: AnnotateConfig,
    pub worker: WorkerConfig,
}

/// Annotation marker spellings.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkersConfig {
    pub primary: String,
    pub alternates: Vec<String>,
    pub punctuation_window: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    pub compare: CompareMode,
    pub json_file_name: String,
    pub backup: bool,
    pub report_preview: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkupConfig {
    pub intro_title: String,
    pub sorted_suffix: String,
    pub sorted_json_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    pub extensions: Vec<String>,
    pub path_commands: Vec<String>,
    pub progress_every: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotateConfig {
    pub multi_word_only: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    pub poll_interval_ms: u64,
}

impl GlossaConfig {
    pub fn marker_set(&self) -> MarkerSet {
        MarkerSet::new(
            &self.markers.primary,
            self.markers.alternates.iter().cloned(),
            self.markers.punctuation_window,
        )
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            markers: self.marker_set(),
            exclusions: ExclusionRules::new(&self.scan.path_commands),
            progress_every: self.scan.progress_every,
        }
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            compare: self.sync.compare,
            json_file_name: self.sync.json_file_name.clone(),
            backup: self.sync.backup,
            report_preview: self.sync.report_preview,
            dry_run: false,
        }
    }

    pub fn annotate_options(&self) -> AnnotateOptions {
        AnnotateOptions {
            multi_word_only: self.annotate.multi_word_only,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.worker.poll_interval_ms.max(1))
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (CLI flags end up here).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<GlossaConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<GlossaConfig, ConfigError> {
    Loader::new().build()
}
