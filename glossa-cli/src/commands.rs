//! Subcommand handlers
//!
//! Each handler gets the parsed arguments and the loaded configuration. Long jobs
//! (sync, scan) run on the background worker while the front end polls it.

use crate::output::{ConsoleProgress, Output};
use crate::prompt::confirm;
use anyhow::{Context, Result};
use clap::ArgMatches;
use glossa_config::GlossaConfig;
use glossa_core::glossary::annotate::Annotator;
use glossa_core::glossary::encoding::{read_source, write_source};
use glossa_core::glossary::json::{load_glossary, to_json_string};
use glossa_core::glossary::loader::GlossaryLoader;
use glossa_core::glossary::markup::{sort_markup, splice_sections};
use glossa_core::glossary::progress::NoProgress;
use glossa_core::glossary::report::scan_report;
use glossa_core::glossary::scanning::Scanner;
use glossa_core::glossary::sync::SyncContext;
use glossa_core::glossary::worker;
use glossa_core::glossary::GlossaryError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

fn path_arg(matches: &ArgMatches, name: &str) -> PathBuf {
    matches
        .get_one::<PathBuf>(name)
        .cloned()
        .unwrap_or_default()
}

fn assume_yes(matches: &ArgMatches) -> bool {
    matches.try_get_one::<bool>("yes").ok().flatten().copied().unwrap_or(false)
}

fn aborted(out: &Output) -> Result<()> {
    out.notice("Aborted, nothing was written.");
    Ok(())
}

/// `glossa sync <markup> <json>`
pub fn sync(matches: &ArgMatches, config: &GlossaConfig) -> Result<()> {
    let out = Output::new();
    let mut options = config.sync_options();
    options.dry_run = matches.get_flag("dry-run");
    let ctx = SyncContext::new(path_arg(matches, "markup"), path_arg(matches, "json"), options);
    if !ctx.markup_path.is_file() {
        return Err(GlossaryError::MissingFile(ctx.markup_path.clone()).into());
    }

    let target = ctx.target();
    if !ctx.options.dry_run {
        if target.coerced {
            let question = format!(
                "The glossary will be saved as {} instead of {}. Continue?",
                target.path.display(),
                target.requested.display()
            );
            if !confirm(&question, assume_yes(matches))? {
                return aborted(&out);
            }
        } else if target.path.exists() {
            let question = format!(
                "{} will be overwritten (a .bak copy is kept). Continue?",
                target.path.display()
            );
            if !confirm(&question, assume_yes(matches))? {
                return aborted(&out);
            }
        }
    }

    let progress = ConsoleProgress::new();
    let job = ctx.clone();
    let outcome = worker::spawn(move |reporter| job.run(reporter))
        .wait(config.poll_interval(), &progress)
        .with_context(|| format!("sync of {} failed", ctx.markup_path.display()))?;
    progress.finish();

    out.report(&outcome.report);
    if let Some(report_path) = matches.get_one::<PathBuf>("report") {
        write_source(report_path, &outcome.report)
            .with_context(|| format!("cannot export report to {}", report_path.display()))?;
        info!(path = %report_path.display(), "report exported");
    }

    if outcome.written {
        out.success(&format!(
            "Saved {} terms to {}",
            outcome.store.len(),
            outcome.target.path.display()
        ));
        if let Some(backup) = &outcome.backup {
            out.line(&format!("Previous version kept in {}", backup.display()));
        }
    } else if ctx.options.dry_run {
        out.notice("Dry run, nothing was written.");
    }
    Ok(())
}

/// `glossa diff <markup> <json>`
pub fn diff(matches: &ArgMatches, config: &GlossaConfig) -> Result<()> {
    let ctx = SyncContext::new(
        path_arg(matches, "markup"),
        path_arg(matches, "json"),
        config.sync_options(),
    );
    let analysis = ctx.analyze(&NoProgress).context("analysis failed")?;
    Output::new().report(&analysis.report);
    Ok(())
}

/// `glossa render <json> <markup>`
pub fn render(matches: &ArgMatches, config: &GlossaConfig) -> Result<()> {
    let out = Output::new();
    let json = path_arg(matches, "json");
    let markup = path_arg(matches, "markup");

    let store = load_glossary(&json)?;
    let document = read_source(&markup)?;
    let rendered = splice_sections(&document, &store, &config.markup.intro_title)
        .with_context(|| format!("cannot place the glossary inside {}", markup.display()))?;

    if rendered == document {
        out.notice(&format!("{} is already up to date.", markup.display()));
        return Ok(());
    }
    let question = format!("Rewrite the letter-sections of {}?", markup.display());
    if !confirm(&question, assume_yes(matches))? {
        return aborted(&out);
    }
    write_source(&markup, &rendered)?;
    out.success(&format!("Wrote {} terms into {}", store.len(), markup.display()));
    Ok(())
}

fn sibling(path: &Path, file_name: &str) -> PathBuf {
    path.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join(file_name)
}

/// `glossa sort-json <json>`
pub fn sort_json(matches: &ArgMatches, config: &GlossaConfig) -> Result<()> {
    let input = path_arg(matches, "json");
    let output = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| sibling(&input, &config.markup.sorted_json_name));

    let store = load_glossary(&input)?;
    write_source(&output, &to_json_string(&store))?;
    Output::new().success(&format!(
        "Sorted {} terms into {}",
        store.len(),
        output.display()
    ));
    Ok(())
}

/// `glossa sort-markup <markup>`
pub fn sort_markup_file(matches: &ArgMatches, config: &GlossaConfig) -> Result<()> {
    let out = Output::new();
    let input = path_arg(matches, "markup");
    let output = matches.get_one::<PathBuf>("output").cloned().unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "glossario".to_string());
        sibling(&input, &format!("{stem}{}.tex", config.markup.sorted_suffix))
    });

    let source = read_source(&input)?;
    let sorted = sort_markup(&source);
    if sorted.sections == 0 {
        out.notice(&format!("No letter-sections found in {}.", input.display()));
    }
    for (title, count) in &sorted.duplicates {
        out.notice(&format!("Duplicate term: {title} appears {count} times"));
    }
    write_source(&output, &sorted.text)?;
    out.success(&format!(
        "Sorted {} sections into {}",
        sorted.sections,
        output.display()
    ));
    Ok(())
}

/// `glossa scan <glossary> <path>`
pub fn scan(matches: &ArgMatches, config: &GlossaConfig) -> Result<()> {
    let glossary = path_arg(matches, "glossary");
    let root = path_arg(matches, "path");
    let terms = GlossaryLoader::new()
        .load_names(&glossary)
        .with_context(|| format!("cannot load glossary {}", glossary.display()))?;
    debug!(terms = terms.len(), "glossary loaded for scan");

    let scanner = Scanner::new(config.scan_options());
    let extensions = config.scan.extensions.clone();
    let job_terms = terms.clone();
    let progress = ConsoleProgress::new();
    let scans = worker::spawn(move |reporter| {
        scanner.scan_path(&root, &extensions, &job_terms, reporter)
    })
    .wait(config.poll_interval(), &progress)?;
    progress.finish();

    let report = scan_report(terms.len(), &scans);
    Output::new().report(&report);

    if let Some(export) = matches.get_one::<PathBuf>("export") {
        let is_json = export
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let contents = if is_json {
            serde_json::to_string_pretty(&scans)?
        } else {
            report
        };
        write_source(export, &contents)
            .with_context(|| format!("cannot export results to {}", export.display()))?;
        info!(path = %export.display(), "scan results exported");
    }
    Ok(())
}

/// `glossa annotate <glossary> <document>`
pub fn annotate(matches: &ArgMatches, config: &GlossaConfig) -> Result<()> {
    let out = Output::new();
    let glossary = path_arg(matches, "glossary");
    let document = path_arg(matches, "document");

    let terms = GlossaryLoader::new()
        .load_names(&glossary)
        .with_context(|| format!("cannot load glossary {}", glossary.display()))?;
    let source = read_source(&document)?;

    let annotator = Annotator::new(Scanner::new(config.scan_options()), config.annotate_options());
    let annotated = annotator.annotate(&source, &terms);

    if annotated.is_unchanged() {
        out.notice(&format!("Every occurrence in {} is already marked.", document.display()));
        return Ok(());
    }
    for (term, count) in &annotated.per_term {
        out.line(&format!("  {term}: {count}"));
    }
    let question = format!(
        "Insert {} markers into {}?",
        annotated.inserted,
        document.display()
    );
    if !confirm(&question, assume_yes(matches))? {
        return aborted(&out);
    }
    write_source(&document, &annotated.text)?;
    out.success(&format!(
        "Inserted {} markers into {}",
        annotated.inserted,
        document.display()
    ));
    Ok(())
}

/// `glossa terms <glossary>`
pub fn terms(matches: &ArgMatches, _config: &GlossaConfig) -> Result<()> {
    let glossary = path_arg(matches, "glossary");
    let names = GlossaryLoader::new().load_names(&glossary)?;
    let out = Output::new();
    for name in &names {
        out.line(name);
    }
    out.notice(&format!("{} terms", names.len()));
    Ok(())
}
