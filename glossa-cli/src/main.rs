//! Command-line interface for glossa
//! Keeps a LaTeX glossary and its JSON export in sync, and checks that project documents
//! annotate every glossary term they use.
//!
//! Usage:
//!   glossa sync `<markup>` `<json>`              - Extract the markup glossary into the JSON export
//!   glossa diff `<markup>` `<json>`              - Show what a sync would change, read only
//!   glossa render `<json>` `<markup>`            - Rewrite the markup letter-sections from JSON
//!   glossa sort-json `<json>`                  - Write an alphabetically sorted copy of the export
//!   glossa sort-markup `<markup>`              - Write a copy of the markup with sorted sections
//!   glossa scan `<glossary>` `<path>`            - Report unannotated term occurrences
//!   glossa annotate `<glossary>` `<document>`    - Insert missing markers into a document
//!   glossa terms `<glossary>`                  - List the glossary term names

mod commands;
mod output;
mod prompt;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use glossa_config::{GlossaConfig, Loader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn path_arg(name: &'static str, help: &'static str, index: usize) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .index(index)
        .value_parser(value_parser!(PathBuf))
}

fn yes_arg() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .help("Answer yes to every confirmation")
        .action(ArgAction::SetTrue)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Destination file (defaults to a sibling of the input)")
        .value_parser(value_parser!(PathBuf))
}

fn build_cli() -> Command {
    Command::new("glossa")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Keeps a LaTeX glossary, its JSON export and the documents using it consistent")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults and ./glossa.toml")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log filter for stderr diagnostics (e.g. 'info', 'glossa_core=debug')")
                .default_value("warn"),
        )
        .subcommand(
            Command::new("sync")
                .about("Extract the markup glossary and save it as JSON")
                .arg(path_arg("markup", "Glossary markup file", 1))
                .arg(path_arg("json", "JSON export to create or update", 2))
                .arg(yes_arg())
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Compute and print the report without writing anything")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .help("Also write the report to this file")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("compare")
                        .long("compare")
                        .help("How definitions are compared")
                        .value_parser(["exact", "case-insensitive"]),
                ),
        )
        .subcommand(
            Command::new("diff")
                .about("Compare the markup glossary with the JSON export, read only")
                .arg(path_arg("markup", "Glossary markup file", 1))
                .arg(path_arg("json", "JSON export", 2)),
        )
        .subcommand(
            Command::new("render")
                .about("Regenerate the markup letter-sections from the JSON export")
                .arg(path_arg("json", "JSON export", 1))
                .arg(path_arg("markup", "Glossary markup file to rewrite", 2))
                .arg(yes_arg()),
        )
        .subcommand(
            Command::new("sort-json")
                .about("Write an alphabetically sorted copy of the JSON export")
                .arg(path_arg("json", "JSON export", 1))
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("sort-markup")
                .about("Write a copy of the markup with terms sorted inside each section")
                .arg(path_arg("markup", "Glossary markup file", 1))
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("scan")
                .about("Report glossary terms used without a marker")
                .arg(path_arg("glossary", "Glossary (.tex or .json)", 1))
                .arg(path_arg("path", "Document or directory to scan", 2))
                .arg(
                    Arg::new("export")
                        .long("export")
                        .help("Write the results to a file (JSON when it ends in .json)")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("annotate")
                .about("Insert the marker after every unmarked term occurrence")
                .arg(path_arg("glossary", "Glossary (.tex or .json)", 1))
                .arg(path_arg("document", "Document to rewrite", 2))
                .arg(yes_arg())
                .arg(
                    Arg::new("multi-word-only")
                        .long("multi-word-only")
                        .help("Only annotate terms made of several words")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("terms")
                .about("List the term names of a glossary")
                .arg(path_arg("glossary", "Glossary (.tex or .json)", 1)),
        )
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Picked up from the working directory when present.
const LOCAL_CONFIG: &str = "glossa.toml";

/// Layer defaults, `./glossa.toml`, `--config` and finally the subcommand flags that
/// mirror configuration keys.
fn load_config(matches: &ArgMatches) -> Result<GlossaConfig> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    match matches.subcommand() {
        Some(("sync", sub)) => {
            if let Some(mode) = sub.get_one::<String>("compare") {
                loader = loader.set_override("sync.compare", mode.as_str())?;
            }
        }
        Some(("annotate", sub)) if sub.get_flag("multi-word-only") => {
            loader = loader.set_override("annotate.multi_word_only", true)?;
        }
        _ => {}
    }
    loader.build().context("invalid configuration")
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    match matches.subcommand() {
        Some(("sync", sub)) => commands::sync(sub, &config),
        Some(("diff", sub)) => commands::diff(sub, &config),
        Some(("render", sub)) => commands::render(sub, &config),
        Some(("sort-json", sub)) => commands::sort_json(sub, &config),
        Some(("sort-markup", sub)) => commands::sort_markup_file(sub, &config),
        Some(("scan", sub)) => commands::scan(sub, &config),
        Some(("annotate", sub)) => commands::annotate(sub, &config),
        Some(("terms", sub)) => commands::terms(sub, &config),
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn main() {
    let matches = build_cli().get_matches();
    let level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("warn");
    init_tracing(level);

    if let Err(err) = run(&matches) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_core::glossary::diff::CompareMode;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn compare_flag_overrides_configuration() {
        let matches = build_cli()
            .try_get_matches_from(["glossa", "sync", "g.tex", "g.json", "--compare", "case-insensitive"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.sync.compare, CompareMode::CaseInsensitive);

        let matches = build_cli()
            .try_get_matches_from(["glossa", "sync", "g.tex", "g.json"])
            .unwrap();
        assert_eq!(load_config(&matches).unwrap().sync.compare, CompareMode::Exact);
    }

    #[test]
    fn multi_word_flag_overrides_configuration() {
        let matches = build_cli()
            .try_get_matches_from(["glossa", "annotate", "g.tex", "doc.tex", "--multi-word-only"])
            .unwrap();
        assert!(load_config(&matches).unwrap().annotate_options().multi_word_only);
    }

    #[test]
    fn global_config_reaches_subcommands() {
        let matches = build_cli()
            .try_get_matches_from(["glossa", "terms", "g.tex", "--config", "custom.toml"])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("config"),
            Some(&PathBuf::from("custom.toml"))
        );
    }
}
