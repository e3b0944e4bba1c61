use std::{
    io::{self, BufReader, Read, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use tncpas_parser::MetadataParser;

/// Parses TNCPAS-0001 metadata blocks out of card release posts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files to parse; reads stdin when none are given
    files: Vec<PathBuf>,

    /// Print the validated flat mapping instead of the formatted record
    #[arg(long, conflicts_with = "records")]
    flat: bool,

    /// Print the raw extracted record lines
    #[arg(long)]
    records: bool,

    /// List the recognized key codes and exit
    #[arg(long, exclusive = true)]
    keys: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    let args = Args::parse();

    if args.keys {
        return print_keys();
    }

    if args.files.is_empty() {
        let input = read_stdin()?;
        process(&input, &args)?;
    } else {
        for path in &args.files {
            let input = std::fs::read_to_string(path)
                .with_context(|| format!("could not read {}", path.display()))?;
            process(&input, &args)?;
        }
    }

    Ok(())
}

fn read_stdin() -> Result<String> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    Ok(input)
}

#[tracing::instrument(skip(input, args))]
fn process(input: &str, args: &Args) -> Result<()> {
    let parser = MetadataParser::new(input);
    let mut stdout = io::stdout();

    if args.records {
        for record in parser.raw_records().map_err(report)? {
            writeln!(stdout, "{record}")?;
        }
    } else if args.flat {
        serde_json::to_writer_pretty(&stdout, &parser.flat().map_err(report)?)?;
        writeln!(stdout)?;
    } else {
        serde_json::to_writer_pretty(&stdout, &parser.parse().map_err(report)?)?;
        writeln!(stdout)?;
    }

    stdout.flush()?;
    Ok(())
}

// Attach the parser's advice, when it has some, as outer context.
fn report(error: tncpas_parser::Error) -> anyhow::Error {
    let advice = error.advice();
    let error = anyhow::Error::new(error);
    match advice {
        Some(advice) => error.context(advice),
        None => error,
    }
}

fn print_keys() -> Result<()> {
    let mut stdout = io::stdout();
    let mut definitions = tncpas_parser::base_definitions();
    definitions.sort_by_key(|(code, _)| *code);
    for (code, definition) in definitions {
        let required = if definition.required { "required" } else { "" };
        writeln!(
            stdout,
            "{code}  {:<14} {required:<9} {}",
            definition.field,
            definition.description.as_deref().unwrap_or_default(),
        )?;
    }
    stdout.flush()?;
    Ok(())
}
