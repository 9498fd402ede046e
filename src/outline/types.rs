use crate::error::{Json2CsvError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::Path;

/// One column of the outline: `[header, dotted_path]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry(pub String, pub String);

impl OutlineEntry {
    pub fn new(header: impl Into<String>, path: impl Into<String>) -> Self {
        OutlineEntry(header.into(), path.into())
    }

    pub fn header(&self) -> &str {
        &self.0
    }

    pub fn path(&self) -> &str {
        &self.1
    }
}

/// A flattening schema: output headers mapped to dotted paths, plus an
/// optional top-level array field to unwrap before iterating records
///
/// On disk this is `{"collection": "...", "map": [[header, path], ...]}`. Deserializing
/// goes through [`Outline::from_value`], so every loaded outline has been validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Outline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    pub map: Vec<OutlineEntry>,
}

impl Outline {
    pub fn new(map: Vec<OutlineEntry>, collection: Option<String>) -> Self {
        Outline { collection, map }
    }

    /// Validate and convert a loaded JSON value
    ///
    /// Fails when the value is not an object, when `map` is missing, not a list or empty,
    /// or when any entry is not a `[header, path]` pair of strings.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut obj) = value else {
            return Err(Json2CsvError::InvalidOutline(
                "expected a JSON object".to_string(),
            ));
        };

        let raw_map = match obj.remove("map") {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(Json2CsvError::InvalidOutline(
                    "\"map\" must be a list of [header, path] pairs".to_string(),
                ))
            }
            None => {
                return Err(Json2CsvError::InvalidOutline(
                    "missing \"map\"".to_string(),
                ))
            }
        };

        if raw_map.is_empty() {
            return Err(Json2CsvError::InvalidOutline(
                "\"map\" must contain at least one entry".to_string(),
            ));
        }

        let map = raw_map
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| {
                serde_json::from_value::<OutlineEntry>(entry).map_err(|e| {
                    Json2CsvError::InvalidOutline(format!(
                        "entry {} is not a [header, path] pair: {}",
                        idx, e
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let collection = match obj.remove("collection") {
            None | Some(Value::Null) => None,
            Some(Value::String(key)) => Some(key),
            Some(_) => {
                return Err(Json2CsvError::InvalidOutline(
                    "\"collection\" must be a string".to_string(),
                ))
            }
        };

        Ok(Outline { collection, map })
    }

    /// Read and validate an outline document
    pub fn from_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        let value: Value =
            serde_json::from_reader(reader).context("Failed to parse outline JSON")?;
        Ok(Self::from_value(value)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open outline: {}", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("Failed to load outline: {}", path.display()))
    }

    /// Write the outline as pretty-printed JSON followed by a newline
    pub fn write_pretty<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self).context("Failed to serialize outline")?;
        writeln!(writer).context("Failed to write outline")?;
        writer.flush().context("Failed to flush outline")
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.map.iter().map(OutlineEntry::header)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

impl TryFrom<Value> for Outline {
    type Error = Json2CsvError;

    fn try_from(value: Value) -> Result<Self> {
        Outline::from_value(value)
    }
}
