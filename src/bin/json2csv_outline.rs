//! json2csv-outline: Generate an outline file for json2csv
//!
//! Scans sample data and writes every distinct leaf path as a `[header, path]` column.
//!
//! Usage:
//!   # Records in the "result" array of one document, writes data.outline.json
//!   json2csv-outline data.json --collection result
//!
//!   # One record per line, explicit output path
//!   json2csv-outline --each-line events.jsonl -o events.outline.json
//!
//!   # Read from stdin, write to stdout
//!   cat events.jsonl | json2csv-outline - --each-line

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use clap::{ArgAction, ArgGroup, Parser};
use json2csv::output::{resolve_output_path, write_atomic};
use json2csv::{generate_outline, generate_outline_file, logging, RecordSource};
use std::io::{stdin, BufReader};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "json2csv-outline")]
#[command(about = "Generate an outline file for json2csv", long_about = None)]
#[command(group(ArgGroup::new("layout").required(true).args(["each_line", "collection"])))]
struct Args {
    /// JSON data file to analyze (`-` for stdin)
    #[arg(value_name = "FILE")]
    input: String,

    /// Path to the outline file to write
    #[arg(short = 'o', long)]
    output_file: Option<PathBuf>,

    /// Process each line of the input as a separate JSON record
    #[arg(short = 'e', long)]
    each_line: bool,

    /// Key of the top-level array holding the records
    #[arg(short = 'c', long, value_name = "KEY")]
    collection: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose)?;

    let source = RecordSource::new(args.each_line, args.collection);
    let output = resolve_output_path(&args.input, args.output_file, "outline.json");

    match (args.input.as_str(), output) {
        ("-", Some(path)) => {
            let outline = generate_outline(BufReader::new(stdin()), &source)?;
            write_atomic(&path, |writer| outline.write_pretty(writer))?;
            info!(columns = outline.len(), path = %path.display(), "Wrote outline");
        }
        (input, Some(path)) => {
            let outline = generate_outline_file(Path::new(input), &path, &source)?;
            info!(columns = outline.len(), path = %path.display(), "Wrote outline");
        }
        (_, None) => {
            let outline = generate_outline(BufReader::new(stdin()), &source)?;
            outline.write_pretty(std::io::stdout().lock())?;
        }
    }

    Ok(())
}
