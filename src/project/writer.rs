use crate::error::Json2CsvError;
use crate::project::projector::Row;
use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;

/// CSV output settings
#[derive(Debug, Clone)]
pub struct WriteConfig {
    /// Field delimiter
    pub delimiter: u8,

    /// Write a header-only file instead of failing when there are no rows
    pub allow_empty: bool,
}

impl Default for WriteConfig {
    fn default() -> Self {
        WriteConfig {
            delimiter: b',',
            allow_empty: false,
        }
    }
}

/// Render one cell
///
/// Missing and null cells are empty. Arrays and objects that were not stringified are
/// written as compact JSON.
pub fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(composite) => composite.to_string(),
    }
}

/// Writes rows as CSV with a fixed header row
pub struct CsvRowWriter<W: Write> {
    writer: csv::Writer<W>,
    headers: Vec<String>,
    rows_written: usize,
}

impl<W: Write> CsvRowWriter<W> {
    /// Wrap a sink and write the header row
    pub fn new(inner: W, headers: Vec<String>, config: &WriteConfig) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(config.delimiter)
            .from_writer(inner);
        writer
            .write_record(&headers)
            .context("Failed to write CSV header")?;

        Ok(CsvRowWriter {
            writer,
            headers,
            rows_written: 0,
        })
    }

    /// Write one row, cells in header order
    pub fn write_row(&mut self, row: &Row) -> Result<()> {
        let record: Vec<String> = self
            .headers
            .iter()
            .map(|header| render_cell(row.get(header)))
            .collect();
        self.writer
            .write_record(&record)
            .with_context(|| format!("Failed to write CSV row {}", self.rows_written + 1))?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn write_rows<'a, I>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Row>,
    {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush CSV writer")
    }
}

/// Write a complete CSV: header row, then every row
///
/// Refuses to write when `rows` is empty unless `allow_empty` is set.
pub fn write_csv<W: Write>(
    inner: W,
    headers: Vec<String>,
    rows: &[Row],
    config: &WriteConfig,
) -> Result<usize> {
    if rows.is_empty() && !config.allow_empty {
        return Err(Json2CsvError::NoRows.into());
    }

    let mut writer = CsvRowWriter::new(inner, headers, config)?;
    writer.write_rows(rows)?;
    writer.flush()?;
    Ok(writer.rows_written())
}
