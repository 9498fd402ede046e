use std::path::PathBuf;
use thiserror::Error;

/// Precondition failures that stop a run before or after projection
///
/// Resolution misses are not represented here: a path that cannot be followed
/// projects to null.
#[derive(Debug, Error)]
pub enum Json2CsvError {
    #[error("invalid outline: {0}")]
    InvalidOutline(String),

    #[error("no rows were loaded")]
    NoRows,

    #[error("malformed JSON on line {line}")]
    MalformedLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("refusing to overwrite the input file {}", .0.display())]
    OutputIsInput(PathBuf),
}

pub type Result<T> = std::result::Result<T, Json2CsvError>;
