//! # json2csv - Flatten nested JSON into CSV
//!
//! Converts semi-structured JSON records into flat rows by following an *outline*: a list
//! of `(header, dotted_path)` columns, optionally with a collection key naming the array
//! of records inside a larger document.
//!
//! ## Modules
//!
//! - **path**: typed dotted paths and tolerant resolution
//! - **outline**: outline files and inference of outlines from sample data
//! - **project**: row projection, value stringification and CSV output
//! - **input**: whole-document and line-delimited record sources
//!
//! ## Quick Start
//!
//! ### Generating an outline
//!
//! ```rust
//! use json2csv::outline::build_outline;
//! use serde_json::json;
//!
//! let records = vec![
//!     json!({"_id": "Someone", "tags": ["a", "b"]}),
//!     json!({"_id": "Another", "count": 2}),
//! ];
//!
//! let outline = build_outline(&records, None);
//! let paths: Vec<&str> = outline.map.iter().map(|e| e.path()).collect();
//! assert_eq!(paths, vec!["_id", "count", "tags.0", "tags.1"]);
//! ```
//!
//! ### Projecting rows
//!
//! ```rust
//! use json2csv::RowProjector;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let projector = RowProjector::from_value(json!({
//!     "map": [["id", "_id"], ["count", "count"]],
//!     "collection": "result"
//! }))?;
//!
//! let rows = projector.process_each(json!({
//!     "result": [{"_id": "Someone", "count": 1}, {"_id": "Another"}]
//! }));
//!
//! assert_eq!(rows[0]["id"], json!("Someone"));
//! assert_eq!(rows[1]["count"], json!(null));
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub mod error;
pub mod input;
pub mod logging;
pub mod outline;
pub mod output;
pub mod path;
pub mod project;

// Re-export commonly used types for convenience
pub use error::Json2CsvError;
pub use input::RecordSource;
pub use outline::{build_outline, enumerate_paths, Outline, OutlineBuilder, OutlineEntry};
pub use path::{DottedPath, Segment};
pub use project::{stringify, Row, RowProjector, StringifyConfig, WriteConfig};

/// Options for a conversion run
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Treat each input line as one JSON record
    pub each_line: bool,

    /// Render composite cells as text with these separators
    pub stringify: Option<StringifyConfig>,

    /// CSV output settings
    pub write: WriteConfig,
}

/// Scan records and derive an outline covering every leaf path seen
pub fn generate_outline<R: BufRead>(reader: R, source: &RecordSource) -> Result<Outline> {
    let mut builder = OutlineBuilder::new();

    for record in source.records(reader)? {
        builder.add_value(&record?);
    }

    debug!(
        records = builder.record_count(),
        paths = builder.path_count(),
        "Outline generated"
    );

    Ok(builder.build(source.collection().map(str::to_string)))
}

/// Load every record of `reader` and project it into rows, stringified if requested
pub fn project_rows<R: BufRead>(
    reader: R,
    projector: &RowProjector,
    options: &ConvertOptions,
) -> Result<Vec<Row>> {
    let rows = if options.each_line {
        projector.process_lines(reader)?
    } else {
        let document = input::read_document(reader)?;
        projector.process_each(document)
    };

    let rows: Vec<Row> = match &options.stringify {
        Some(config) => rows
            .into_iter()
            .map(|row| project::stringify_row(row, config))
            .collect(),
        None => rows,
    };

    info!(rows = rows.len(), columns = projector.columns().len(), "Projected rows");
    Ok(rows)
}

/// Project every record of `reader` through `projector` and write CSV to `writer`
///
/// Returns the number of data rows written.
pub fn convert<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    projector: &RowProjector,
    options: &ConvertOptions,
) -> Result<usize> {
    let rows = project_rows(reader, projector, options)?;
    project::write_csv(writer, projector.headers(), &rows, &options.write)
}

/// Convert the JSON file at `input` into a CSV file at `csv_path`
///
/// The input is read and projected in full before `csv_path` is touched, and the CSV
/// replaces it only once it has been completely written. Refuses to run when `csv_path`
/// is the input file.
pub fn convert_file(
    input: &Path,
    csv_path: &Path,
    projector: &RowProjector,
    options: &ConvertOptions,
) -> Result<usize> {
    output::ensure_distinct(input, csv_path)?;

    let file = File::open(input)
        .with_context(|| format!("Failed to open input: {}", input.display()))?;
    convert_to_path(BufReader::new(file), csv_path, projector, options)
}

/// Project every record of `reader` and write the CSV to `csv_path`
///
/// Nothing is written when projection fails or produces no rows (unless `allow_empty`
/// is set), and an existing file at `csv_path` is only replaced by a complete CSV.
pub fn convert_to_path<R: BufRead>(
    reader: R,
    csv_path: &Path,
    projector: &RowProjector,
    options: &ConvertOptions,
) -> Result<usize> {
    let rows = project_rows(reader, projector, options)?;

    if rows.is_empty() && !options.write.allow_empty {
        return Err(Json2CsvError::NoRows.into());
    }

    output::write_atomic(csv_path, |writer| {
        project::write_csv(writer, projector.headers(), &rows, &options.write)
    })
}

/// Generate an outline from the file at `input` and write it to `outline_path`
pub fn generate_outline_file(
    input: &Path,
    outline_path: &Path,
    source: &RecordSource,
) -> Result<Outline> {
    output::ensure_distinct(input, outline_path)?;

    let file = File::open(input)
        .with_context(|| format!("Failed to open input: {}", input.display()))?;
    let outline = generate_outline(BufReader::new(file), source)?;

    output::write_atomic(outline_path, |writer| outline.write_pretty(writer))?;
    Ok(outline)
}

/// Output path derived from the input by replacing its extension
///
/// `data.json` becomes `data.csv` or `data.outline.json`.
pub fn default_output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}
