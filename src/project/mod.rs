//! Row projection - flatten records into CSV rows following an outline
//!
//! `RowProjector` resolves each outline path against each record, `stringify` renders
//! composite cells as text when requested, and `CsvRowWriter` writes the rows out.

pub mod projector;
pub mod stringify;
pub mod writer;

pub use projector::{Column, Row, RowProjector};
pub use stringify::{stringify, stringify_row, StringifyConfig};
pub use writer::{render_cell, write_csv, CsvRowWriter, WriteConfig};
