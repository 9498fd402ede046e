//! Record sources
//!
//! Whole-document mode parses the input once and unwraps the collection field on the
//! loaded document. Line-delimited mode parses one line at a time; the collection field,
//! when present, is unwrapped inside each line's record.

use crate::error::Json2CsvError;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::VecDeque;
use std::io::{BufRead, Lines, Read};
use tracing::{debug, warn};

/// How records are laid out in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    /// One JSON document holding an array of records, or an object with a
    /// `collection` field holding that array
    Document { collection: Option<String> },
    /// One JSON document per line
    Lines { collection: Option<String> },
}

impl RecordSource {
    pub fn new(each_line: bool, collection: Option<String>) -> Self {
        if each_line {
            RecordSource::Lines { collection }
        } else {
            RecordSource::Document { collection }
        }
    }

    pub fn collection(&self) -> Option<&str> {
        match self {
            RecordSource::Document { collection } | RecordSource::Lines { collection } => {
                collection.as_deref()
            }
        }
    }

    /// Iterate records from `reader` according to this layout
    pub fn records<'a, R: BufRead + 'a>(
        &self,
        reader: R,
    ) -> Result<Box<dyn Iterator<Item = Result<Value>> + 'a>> {
        match self {
            RecordSource::Document { collection } => {
                let document = read_document(reader)?;
                let records = unwrap_collection(document, collection.as_deref());
                debug!(records = records.len(), "Loaded JSON document");
                Ok(Box::new(records.into_iter().map(Ok::<Value, anyhow::Error>)))
            }
            RecordSource::Lines { collection } => {
                Ok(Box::new(LineRecords::new(reader, collection.clone())))
            }
        }
    }
}

/// Parse a whole JSON document
///
/// Tries the SIMD parser on a scratch copy first. On failure the original bytes are
/// re-parsed with serde_json so the error points at the real input.
pub fn read_document<R: Read>(mut reader: R) -> Result<Value> {
    let mut content = Vec::new();
    reader
        .read_to_end(&mut content)
        .context("Failed to read JSON input")?;

    let mut scratch = content.clone();
    if let Ok(value) = simd_json::serde::from_slice::<Value>(&mut scratch) {
        return Ok(value);
    }

    serde_json::from_slice(&content).context("Failed to parse JSON document")
}

/// Turn a loaded value into the records it holds
///
/// With a collection key present on an object, the field's value is used instead of the
/// object. An array yields its elements; anything else is a single record.
pub fn unwrap_collection(value: Value, collection: Option<&str>) -> Vec<Value> {
    let value = match (collection, value) {
        (Some(key), Value::Object(mut obj)) => match obj.remove(key) {
            Some(inner) => inner,
            None => {
                warn!(collection = key, "Collection key not found, using the value itself");
                Value::Object(obj)
            }
        },
        (_, value) => value,
    };

    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Streaming iterator over line-delimited records
///
/// Blank lines are skipped. A line that fails to parse ends the iteration with
/// [`Json2CsvError::MalformedLine`].
pub struct LineRecords<R: BufRead> {
    lines: Lines<R>,
    line_no: usize,
    collection: Option<String>,
    pending: VecDeque<Value>,
    failed: bool,
}

impl<R: BufRead> LineRecords<R> {
    pub fn new(reader: R, collection: Option<String>) -> Self {
        LineRecords {
            lines: reader.lines(),
            line_no: 0,
            collection,
            pending: VecDeque::new(),
            failed: false,
        }
    }

    fn next_line(&mut self) -> Option<Result<Value>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(anyhow::Error::new(e)
                        .context(format!("Failed to read line {}", self.line_no + 1))))
                }
            };
            self.line_no += 1;

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            return Some(serde_json::from_str(line).map_err(|source| {
                anyhow::Error::from(Json2CsvError::MalformedLine {
                    line: self.line_no,
                    source,
                })
            }));
        }
    }
}

impl<R: BufRead> Iterator for LineRecords<R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }
            if self.failed {
                return None;
            }

            match self.next_line()? {
                Ok(value) => match self.collection.as_deref() {
                    Some(key) if value.get(key).is_some() => {
                        self.pending.extend(unwrap_collection(value, Some(key)));
                    }
                    _ => return Some(Ok(value)),
                },
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collect(source: &RecordSource, input: &str) -> Result<Vec<Value>> {
        source.records(input.as_bytes())?.collect()
    }

    #[test]
    fn test_document_top_level_array() {
        let source = RecordSource::new(false, None);
        let records = collect(&source, r#"[{"a": 1}, {"a": 2}]"#).unwrap();
        assert_eq!(records, vec![json!({"a": 1}), json!({"a": 2})]);
    }

    #[test]
    fn test_document_collection_unwrap() {
        let source = RecordSource::new(false, Some("result".to_string()));
        let records = collect(&source, r#"{"result": [{"_id": "Someone"}], "meta": 1}"#).unwrap();
        assert_eq!(records, vec![json!({"_id": "Someone"})]);
    }

    #[test]
    fn test_document_missing_collection_uses_document() {
        let records = unwrap_collection(json!({"other": 1}), Some("result"));
        assert_eq!(records, vec![json!({"other": 1})]);
    }

    #[test]
    fn test_document_single_object_is_one_record() {
        let records = unwrap_collection(json!({"a": 1}), None);
        assert_eq!(records, vec![json!({"a": 1})]);
    }

    #[test]
    fn test_document_malformed_is_error() {
        let source = RecordSource::new(false, None);
        assert!(collect(&source, r#"[{"a": 1},"#).is_err());
    }

    #[test]
    fn test_lines_in_order_skipping_blanks() {
        let source = RecordSource::new(true, None);
        let input = "{\"a\": 1}\n\n{\"b\": 2}\n   \n{\"a\": 3, \"c\": [1]}\n";
        let records = collect(&source, input).unwrap();

        assert_eq!(
            records,
            vec![json!({"a": 1}), json!({"b": 2}), json!({"a": 3, "c": [1]})]
        );
    }

    #[test]
    fn test_lines_collection_unwrapped_per_line() {
        let source = RecordSource::new(true, Some("items".to_string()));
        let input = "{\"items\": [{\"n\": 1}, {\"n\": 2}]}\n{\"n\": 3}\n{\"items\": {\"n\": 4}}\n";
        let records = collect(&source, input).unwrap();

        assert_eq!(
            records,
            vec![json!({"n": 1}), json!({"n": 2}), json!({"n": 3}), json!({"n": 4})]
        );
    }

    #[test]
    fn test_lines_malformed_reports_line_number() {
        let source = RecordSource::new(true, None);
        let input = "{\"a\": 1}\n\n{not json}\n{\"a\": 2}\n";
        let mut records = source.records(input.as_bytes()).unwrap();

        assert!(records.next().unwrap().is_ok());
        let err = records.next().unwrap().unwrap_err();
        match err.downcast_ref::<Json2CsvError>() {
            Some(Json2CsvError::MalformedLine { line, .. }) => assert_eq!(*line, 3),
            other => panic!("Expected MalformedLine, got {:?}", other),
        }
        assert!(records.next().is_none());
    }
}
