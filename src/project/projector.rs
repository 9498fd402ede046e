//! Outline-driven row projection
//!
//! The projector parses each outline path once, then resolves every path against every
//! record. A path that cannot be followed yields null for that cell; heterogeneous
//! records never abort a batch.

use crate::error::{Json2CsvError, Result};
use crate::input::{unwrap_collection, LineRecords};
use crate::outline::Outline;
use crate::path::DottedPath;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;
use std::io::BufRead;
use tracing::{trace, warn};

/// One flat output row: header to cell value, in outline order
pub type Row = IndexMap<String, Value>;

/// A column resolved from an outline entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub path: DottedPath,
}

/// Projects records into flat rows following an outline
///
/// Holds no per-run state: every call returns its rows to the caller, so one projector
/// can be reused across datasets.
#[derive(Debug, Clone)]
pub struct RowProjector {
    columns: Vec<Column>,
    collection: Option<String>,
}

impl RowProjector {
    /// Build a projector from a loaded outline
    ///
    /// Fails when the outline has no columns.
    pub fn new(outline: &Outline) -> Result<Self> {
        if outline.is_empty() {
            return Err(Json2CsvError::InvalidOutline(
                "\"map\" must contain at least one entry".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let columns = outline
            .map
            .iter()
            .map(|entry| {
                if !seen.insert(entry.header()) {
                    warn!(header = entry.header(), "Duplicate header in outline");
                }
                Column {
                    header: entry.header().to_string(),
                    path: DottedPath::parse(entry.path()),
                }
            })
            .collect();

        Ok(RowProjector {
            columns,
            collection: outline.collection.clone(),
        })
    }

    /// Validate a raw outline document and build a projector from it
    pub fn from_value(outline: Value) -> Result<Self> {
        Self::new(&Outline::from_value(outline)?)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    /// Project one record
    pub fn process_row(&self, record: &Value) -> Row {
        if !record.is_object() {
            trace!("Projecting a record that is not an object");
        }

        self.columns
            .iter()
            .map(|column| {
                let value = column.path.resolve(record).cloned().unwrap_or(Value::Null);
                (column.header.clone(), value)
            })
            .collect()
    }

    /// Project every record of a loaded document
    ///
    /// When the collection key is configured and present at the top level of `data`,
    /// its value is projected instead. An array yields one row per element.
    pub fn process_each(&self, data: Value) -> Vec<Row> {
        unwrap_collection(data, self.collection())
            .iter()
            .map(|record| self.process_row(record))
            .collect()
    }

    /// Project line-delimited input, one JSON document per line
    ///
    /// The collection key, when present on a line's record, is unwrapped within that
    /// line. The first malformed line aborts the run.
    pub fn process_lines<R: BufRead>(&self, reader: R) -> anyhow::Result<Vec<Row>> {
        LineRecords::new(reader, self.collection.clone())
            .map(|record| record.map(|r| self.process_row(&r)))
            .collect()
    }
}
