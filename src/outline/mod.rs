//! Outlines: flattening schemas derived from sample data
//!
//! An outline lists `(header, dotted_path)` columns and an optional collection key.
//! The generator scans records for every distinct leaf path; the projector replays the
//! outline over the full dataset.

pub mod builder;
pub mod types;

pub use builder::{build_outline, enumerate_paths, OutlineBuilder};
pub use types::{Outline, OutlineEntry};
