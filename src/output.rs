//! Writing output files without clobbering data
//!
//! Output is written to a temporary file in the destination directory and renamed over
//! the destination only once everything has been written. A failed run leaves whatever
//! was at the destination untouched.

use crate::error::Json2CsvError;
use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where a command writes its output
///
/// An explicit path wins. Otherwise stdin input (`-`) goes to stdout (`None`) and file
/// input gets the input path with its extension replaced.
pub fn resolve_output_path(
    input: &str,
    explicit: Option<PathBuf>,
    extension: &str,
) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path),
        None if input == "-" => None,
        None => Some(crate::default_output_path(Path::new(input), extension)),
    }
}

/// Fail when `output` names the same file as `input`
pub fn ensure_distinct(input: &Path, output: &Path) -> Result<()> {
    if !output.exists() {
        return Ok(());
    }

    let input_real = input
        .canonicalize()
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let output_real = output
        .canonicalize()
        .with_context(|| format!("Failed to resolve output path: {}", output.display()))?;

    if input_real == output_real {
        return Err(Json2CsvError::OutputIsInput(output.to_path_buf()).into());
    }
    Ok(())
}

/// Run `write` against a temporary sibling of `final_path`, then move it into place
///
/// If `write` fails, the temporary file is dropped and removed.
pub fn write_atomic<T, F>(final_path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<NamedTempFile>) -> Result<T>,
{
    let parent_dir = match final_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let temp_file = NamedTempFile::new_in(parent_dir).with_context(|| {
        format!("Failed to create temporary file in {}", parent_dir.display())
    })?;

    let mut writer = BufWriter::new(temp_file);
    let value = write(&mut writer)?;
    writer.flush().context("Failed to flush output")?;

    let temp_file = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush output: {}", e.error()))?;
    temp_file
        .persist(final_path)
        .with_context(|| format!("Failed to write {}", final_path.display()))?;

    Ok(value)
}
