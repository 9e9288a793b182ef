//! # Quill - spell check a text file
//!
//! Loads a file into a quill buffer and reports every word the
//! dictionary does not know, with suggested corrections.
//!
//! ```bash
//! cargo run -- notes.txt --dict /usr/share/dict/words
//! cargo run -- notes.txt --json -v
//! ```

use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use quill_core::{Config, Misspelling, Session};

/// Quill - report misspelled words in a text file
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to check
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Word list to check against (one word per line)
    #[arg(short, long, value_name = "PATH")]
    dict: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum suggestions per word
    #[arg(short = 'n', long, value_name = "N")]
    max_suggestions: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// JSON report layout.
#[derive(Serialize)]
struct Report<'a> {
    file: &'a Path,
    lines: usize,
    misspellings: &'a [Misspelling],
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    tracing::info!("Starting Quill v{}", env!("CARGO_PKG_VERSION"));

    let config = resolve_config(&args)?;
    let found = run(&args, config, &mut std::io::stdout().lock())?;

    Ok(if found == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Installs the log subscriber. `RUST_LOG` overrides the `-v` count.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(filter)
        .init();
}

/// Reads the config file and applies command-line overrides.
fn resolve_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    if let Some(dict) = &args.dict {
        config.spelling.dictionary = Some(dict.clone());
    }
    if let Some(max) = args.max_suggestions {
        config.spelling.max_suggestions = max;
    }
    Ok(config)
}

/// Checks the file and writes the report. Returns the number of
/// misspelled words.
fn run(args: &Args, config: Config, out: &mut impl Write) -> anyhow::Result<usize> {
    let dictionary = config.spelling.dictionary.clone().ok_or_else(|| {
        anyhow::anyhow!("No dictionary given; pass --dict or set spelling.dictionary")
    })?;

    let mut session = Session::new(config);
    session.open(&args.file)?;
    let words = session.load_dictionary(&dictionary)?;
    tracing::info!(
        words,
        dictionary = %dictionary.display(),
        max_suggestions = session.config().spelling.max_suggestions,
        "dictionary ready"
    );

    let found = session.misspellings()?;

    if args.json {
        let report = Report {
            file: &args.file,
            lines: session.buffer().line_count(),
            misspellings: &found,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        for m in &found {
            write!(
                out,
                "{}:{}:{}: {}",
                args.file.display(),
                m.row + 1,
                m.columns.start + 1,
                m.word
            )?;
            if !m.suggestions.is_empty() {
                write!(out, " (did you mean: {})", m.suggestions.join(", "))?;
            }
            writeln!(out)?;
        }
    }

    Ok(found.len())
}
