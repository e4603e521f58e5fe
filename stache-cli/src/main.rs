//! Command-line interface for stache
//!
//! Usage:
//!   stache parse `<path>` [--format `<format>`]      - Print the document tree
//!   stache validate `<path>`                        - Report diagnostics only
//!   stache tokens `<path>` [--format `<format>`]     - Print the token list
//!
//! Common options: `--config <file>` layers a TOML file over the built-in defaults,
//! `--partial <name>` (repeatable) registers a partial declared elsewhere.
//!
//! Exit status is 0 for a clean template, 1 when it has diagnostics and 2 when the
//! template or configuration could not be read. Logging goes to stderr and is
//! controlled by `STACHE_LOG` (default `warn`).

mod report;

use clap::{Arg, ArgAction, ArgMatches, Command};
use report::Reporter;
use stache_config::{Loader, StacheConfig};
use stache_parser::stache::formats::{self, Format, FormatError};
use stache_parser::stache::{LoaderError, ParserOptions, TemplateLoader};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] stache_config::ConfigError),
    #[error("{0}")]
    Load(#[from] LoaderError),
    #[error("{0}")]
    Format(#[from] FormatError),
}

fn command() -> Command {
    let path = Arg::new("path")
        .help("Path to the template file")
        .required(true)
        .index(1);
    let format = Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format: treeviz, json or yaml (default from config)");

    Command::new("stache")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting stache templates")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("partial")
                .long("partial")
                .short('p')
                .global(true)
                .action(ArgAction::Append)
                .help("Register a partial name declared outside the template"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a template and print its document tree")
                .arg(path.clone())
                .arg(format.clone()),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a template and report diagnostics")
                .arg(path.clone()),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the tokens of a template")
                .arg(path)
                .arg(format)
                .arg(
                    Arg::new("no-positions")
                        .long("no-positions")
                        .action(ArgAction::SetTrue)
                        .help("Omit line:column from the treeviz token listing"),
                ),
        )
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("STACHE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();
    match run(&matches) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::from(2)
        }
    }
}

fn load_config(sub: &ArgMatches) -> Result<StacheConfig, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = sub.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Ok(Some(format)) = sub.try_get_one::<String>("format") {
        let format: Format = format.parse()?;
        loader = loader.with_format(&format.to_string())?;
    }
    if sub.try_get_one::<bool>("no-positions").ok().flatten() == Some(&true) {
        loader = loader.with_show_positions(false)?;
    }
    Ok(loader.build()?)
}

fn parser_options(config: &StacheConfig, sub: &ArgMatches) -> ParserOptions {
    let mut partials = config.parser.partials.clone();
    if let Some(extra) = sub.get_many::<String>("partial") {
        partials.extend(extra.cloned());
    }
    ParserOptions::new().with_partials(partials)
}

fn run(matches: &ArgMatches) -> Result<ExitCode, CliError> {
    let Some((name, sub)) = matches.subcommand() else {
        return Ok(ExitCode::from(2));
    };
    let config = load_config(sub)?;
    let options = parser_options(&config, sub);
    let format: Format = config.output.format.as_str().parse()?;

    let path = sub
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or_default();
    let loader = TemplateLoader::from_path(path)?.with_options(options);
    let reporter = Reporter::new(path, loader.source(), config.diagnostics.show_source);
    tracing::debug!(command = name, path, %format, "running");

    match name {
        "parse" => {
            let output = loader.parse()?;
            match output.document {
                Some(document) => {
                    let rendered = match format {
                        Format::Treeviz => formats::to_treeviz_str(&document),
                        Format::Json => formats::to_json(&document)?,
                        Format::Yaml => formats::to_yaml(&document)?,
                    };
                    print!("{}", ensure_newline(rendered));
                    Ok(ExitCode::SUCCESS)
                }
                None => Ok(reporter.report(&output.diagnostics)),
            }
        }
        "validate" => validate(&loader, path, &reporter),
        "tokens" => {
            let output = loader.tokenize()?;
            let rendered = match format {
                Format::Treeviz => {
                    formats::to_token_listing(&output.tokens, config.output.show_positions)
                }
                Format::Json => formats::to_json(&output.tokens)?,
                Format::Yaml => formats::to_yaml(&output.tokens)?,
            };
            print!("{}", ensure_newline(rendered));
            Ok(reporter.report(&output.diagnostics))
        }
        other => {
            eprintln!("unknown command '{}'", other);
            Ok(ExitCode::from(2))
        }
    }
}

/// Report diagnostics; an internal error is never reported as a clean template
fn validate(
    loader: &TemplateLoader,
    path: &str,
    reporter: &Reporter<'_>,
) -> Result<ExitCode, CliError> {
    let diagnostics = loader.validate()?;
    if diagnostics.is_empty() {
        println!("{}: ok", path);
    }
    Ok(reporter.report(&diagnostics))
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
