use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("glossa-core")
        .join("fixtures")
        .join(name)
}

fn copy_fixture(name: &str, dir: &Path) -> PathBuf {
    let target = dir.join(name);
    fs::copy(fixture_path(name), &target).unwrap();
    target
}

#[test]
fn sync_updates_json_and_keeps_backup() {
    let dir = tempfile::tempdir().unwrap();
    let markup = copy_fixture("glossario.tex", dir.path());
    let json = copy_fixture("glossario.json", dir.path());

    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("sync").arg(&markup).arg(&json).arg("--yes");
    cmd.assert().success().stdout(
        predicate::str::contains("GLOSSARY SYNC REPORT")
            .and(predicate::str::contains("  Added: 5"))
            .and(predicate::str::contains("  Removed: 1"))
            .and(predicate::str::contains("Sync completed")),
    );

    let written = fs::read_to_string(&json).unwrap();
    assert!(written.contains("Requirements and Technology Baseline"));
    assert!(!written.contains("Sprint"));
    assert!(dir.path().join("glossario.json.bak").exists());
}

#[test]
fn sync_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let markup = copy_fixture("glossario.tex", dir.path());
    let json = copy_fixture("glossario.json", dir.path());
    let before = fs::read_to_string(&json).unwrap();

    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("sync").arg(&markup).arg(&json).arg("--dry-run");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Dry run, nothing was written."));

    assert_eq!(fs::read_to_string(&json).unwrap(), before);
    assert!(!dir.path().join("glossario.json.bak").exists());
}

#[test]
fn sync_declined_prompt_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let markup = copy_fixture("glossario.tex", dir.path());
    let json = copy_fixture("glossario.json", dir.path());
    let before = fs::read_to_string(&json).unwrap();

    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("sync").arg(&markup).arg(&json).write_stdin("n\n");
    cmd.assert().success().stdout(predicate::str::contains("Aborted"));

    assert_eq!(fs::read_to_string(&json).unwrap(), before);
}

#[test]
fn sync_reports_missing_markup_before_prompting() {
    let dir = tempfile::tempdir().unwrap();
    let json = copy_fixture("glossario.json", dir.path());
    let before = fs::read_to_string(&json).unwrap();

    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("sync")
        .arg(dir.path().join("missing.tex"))
        .arg(&json)
        .write_stdin("s\n");
    cmd.assert().failure().stderr(
        predicate::str::contains("File not found")
            .and(predicate::str::contains("[s/N]").not()),
    );

    assert_eq!(fs::read_to_string(&json).unwrap(), before);
    assert!(!dir.path().join("glossario.json.bak").exists());
}

#[test]
fn sync_compare_flag_ignores_case_only_edits() {
    let dir = tempfile::tempdir().unwrap();
    let markup = copy_fixture("glossario.tex", dir.path());
    let json = dir.path().join("glossario.json");
    let source = fs::read_to_string(fixture_path("glossario.json")).unwrap();
    let definition = "Application Programming Interface: insieme di regole che permette a due programmi di comunicare.";
    fs::write(&json, source.replace(definition, &definition.to_uppercase())).unwrap();

    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("sync")
        .arg(&markup)
        .arg(&json)
        .arg("--dry-run")
        .arg("--compare")
        .arg("case-insensitive");
    cmd.assert().success().stdout(
        predicate::str::contains("  Modified: 1").and(predicate::str::contains("  Unchanged: 1")),
    );
}

#[test]
fn sync_exports_report() {
    let dir = tempfile::tempdir().unwrap();
    let markup = copy_fixture("glossario.tex", dir.path());
    let json = dir.path().join("glossario.json");
    let report = dir.path().join("report.txt");

    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("sync")
        .arg(&markup)
        .arg(&json)
        .arg("--report")
        .arg(&report);
    cmd.assert().success();

    assert!(json.exists());
    let exported = fs::read_to_string(&report).unwrap();
    assert!(exported.contains("  Added: 7"));
}

#[test]
fn diff_is_read_only() {
    let dir = tempfile::tempdir().unwrap();
    let markup = copy_fixture("glossario.tex", dir.path());
    let json = copy_fixture("glossario.json", dir.path());
    let before = fs::read_to_string(&json).unwrap();

    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("diff").arg(&markup).arg(&json);
    cmd.assert().success().stdout(
        predicate::str::contains("DIFFERENCE ANALYSIS (READ ONLY)")
            .and(predicate::str::contains("  - Sprint")),
    );

    assert_eq!(fs::read_to_string(&json).unwrap(), before);
}

#[test]
fn terms_lists_markup_names() {
    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("terms").arg(fixture_path("glossario.tex"));
    cmd.assert().success().stdout(
        predicate::str::contains("Way of Working")
            .and(predicate::str::contains("7 terms"))
            .and(predicate::str::contains("Bozza").not()),
    );
}

#[test]
fn scan_reports_unmarked_occurrences() {
    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("scan")
        .arg(fixture_path("glossario.tex"))
        .arg(fixture_path("documento.tex"));
    cmd.assert().success().stdout(
        predicate::str::contains("SCAN COMPLETED")
            .and(predicate::str::contains("      - Backlog:"))
            .and(predicate::str::contains("   Occurrences without marker: 4")),
    );
}

#[test]
fn scan_exports_json_results() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("scan.json");

    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("scan")
        .arg(fixture_path("glossario.tex"))
        .arg(fixture_path("documento.tex"))
        .arg("--export")
        .arg(&export);
    cmd.assert().success();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(1));
}

#[test]
fn annotate_inserts_markers() {
    let dir = tempfile::tempdir().unwrap();
    let document = copy_fixture("documento.tex", dir.path());

    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("annotate")
        .arg(fixture_path("glossario.tex"))
        .arg(&document)
        .arg("--yes");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Inserted 4 markers"));

    let text = fs::read_to_string(&document).unwrap();
    assert!(text.contains("Il Backlog\\G viene"));
    assert!(text.contains("(RTB)\\G"));

    let mut again = cargo_bin_cmd!("glossa");
    again
        .arg("annotate")
        .arg(fixture_path("glossario.tex"))
        .arg(&document)
        .arg("--yes");
    again
        .assert()
        .success()
        .stdout(predicate::str::contains("already marked"));
}

#[test]
fn sort_json_writes_sibling_file() {
    let dir = tempfile::tempdir().unwrap();
    let json = copy_fixture("glossario.json", dir.path());

    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("sort-json").arg(&json);
    cmd.assert().success().stdout(predicate::str::contains("Sorted 3 terms"));

    assert!(dir.path().join("glossario_ordinato.json").exists());
}

#[test]
fn sort_markup_writes_sorted_copy() {
    let dir = tempfile::tempdir().unwrap();
    let markup = copy_fixture("glossario.tex", dir.path());

    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("sort-markup").arg(&markup);
    cmd.assert().success();

    let sorted = fs::read_to_string(dir.path().join("glossario_ordinato.tex")).unwrap();
    assert!(sorted.contains("\\section{Introduzione}"));
}

#[test]
fn render_rewrites_markup_from_json() {
    let dir = tempfile::tempdir().unwrap();
    let markup = copy_fixture("glossario.tex", dir.path());
    let json = copy_fixture("glossario.json", dir.path());

    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("render").arg(&json).arg(&markup).arg("--yes");
    cmd.assert().success().stdout(predicate::str::contains("Wrote 3 terms"));

    let text = fs::read_to_string(&markup).unwrap();
    assert!(text.contains("\\subsection{Sprint}"));
    assert!(!text.contains("\\subsection{Way of Working}"));
    assert!(text.contains("\\section{Introduzione}"));
}

#[test]
fn missing_glossary_fails_with_message() {
    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("terms").arg("does-not-exist.tex");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn invalid_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("glossa.toml");
    fs::write(&config, "[markers]\npunctuation_window = \"many\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("glossa");
    cmd.arg("terms")
        .arg(fixture_path("glossario.tex"))
        .arg("--config")
        .arg(&config);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}
