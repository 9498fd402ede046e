//! json2csv: Convert JSON to CSV following an outline
//!
//! Usage:
//!   # Convert a document, writes data.csv
//!   json2csv data.json data.outline.json
//!
//!   # Line-delimited input, composite cells rendered as text
//!   json2csv --each-line --strings events.jsonl events.outline.json -o events.csv
//!
//!   # Read from stdin, write to stdout
//!   cat events.jsonl | json2csv - events.outline.json --each-line

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use json2csv::output::resolve_output_path;
use json2csv::{
    convert, convert_file, convert_to_path, logging, ConvertOptions, Outline, RowProjector,
    StringifyConfig, WriteConfig,
};
use std::io::{stdin, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "json2csv")]
#[command(about = "Converts JSON to CSV", long_about = None)]
struct Args {
    /// JSON data file to load (`-` for stdin)
    #[arg(value_name = "FILE")]
    input: String,

    /// Outline file mapping CSV headers to dotted JSON paths
    #[arg(value_name = "OUTLINE")]
    outline: PathBuf,

    /// Process each line of the input as a separate JSON record
    #[arg(short = 'e', long)]
    each_line: bool,

    /// Path to the CSV file to write
    #[arg(short = 'o', long)]
    output_csv: Option<PathBuf>,

    /// Render arrays and objects as text instead of JSON
    #[arg(short = 's', long)]
    strings: bool,

    /// Separator between list elements (with --strings)
    #[arg(long, default_value = ", ", requires = "strings")]
    list_separator: String,

    /// Separator between an object key and its value (with --strings)
    #[arg(long, default_value = ": ", requires = "strings")]
    kv_separator: String,

    /// Separator between object entries (with --strings)
    #[arg(long, default_value = "\n", requires = "strings")]
    entry_separator: String,

    /// Text written before an object's entries (with --strings)
    #[arg(long, default_value = "", requires = "strings")]
    open: String,

    /// Text written after an object's entries (with --strings)
    #[arg(long, default_value = "", requires = "strings")]
    close: String,

    /// Text written for null and missing values (with --strings)
    #[arg(long, default_value = "", requires = "strings")]
    null_text: String,

    /// CSV field delimiter (a single ASCII character)
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Write a header-only CSV when no rows were produced
    #[arg(long)]
    allow_empty: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose)?;

    if !args.delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got {:?}", args.delimiter);
    }

    let outline = Outline::from_path(&args.outline)?;
    let projector = RowProjector::new(&outline)
        .with_context(|| format!("Unusable outline: {}", args.outline.display()))?;

    let options = ConvertOptions {
        each_line: args.each_line,
        stringify: args.strings.then(|| StringifyConfig {
            list_separator: args.list_separator.clone(),
            kv_separator: args.kv_separator.clone(),
            entry_separator: args.entry_separator.clone(),
            open: args.open.clone(),
            close: args.close.clone(),
            null_text: args.null_text.clone(),
        }),
        write: WriteConfig {
            delimiter: args.delimiter as u8,
            allow_empty: args.allow_empty,
        },
    };

    let output = resolve_output_path(&args.input, args.output_csv, "csv");

    match (args.input.as_str(), output) {
        ("-", Some(path)) => {
            let written = convert_to_path(BufReader::new(stdin()), &path, &projector, &options)?;
            info!(rows = written, path = %path.display(), "Wrote CSV");
        }
        (input, Some(path)) => {
            let written = convert_file(Path::new(input), &path, &projector, &options)?;
            info!(rows = written, path = %path.display(), "Wrote CSV");
        }
        (_, None) => {
            let mut stdout = std::io::stdout().lock();
            convert(BufReader::new(stdin()), &mut stdout, &projector, &options)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
