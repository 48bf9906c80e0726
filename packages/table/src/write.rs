//! CSV writing.
//!
//! Output has a header row, no index column, `\n` line endings, and empty
//! fields for missing cells. [`write_csv_atomic`] never leaves a partially
//! written file at the destination.

use std::io::Write;
use std::path::Path;

use crate::{Frame, TABLE, TableError, literal};

fn copy_to(frame: &Frame, path: &Path) -> Result<(), TableError> {
    frame.conn.execute_batch(&format!(
        "COPY {TABLE} TO {} (FORMAT csv, HEADER true, DELIMITER ',', QUOTE '\"')",
        literal(&path.to_string_lossy())
    ))?;
    Ok(())
}

/// Writes `frame` as CSV to any writer.
///
/// # Errors
///
/// Returns [`TableError::DuckDb`] or [`TableError::Io`] if writing fails.
pub fn write_csv_to<W: Write>(frame: &Frame, mut writer: W) -> Result<(), TableError> {
    let staging = tempfile::TempDir::new()?;
    let path = staging.path().join("frame.csv");
    copy_to(frame, &path)?;

    std::io::copy(&mut std::fs::File::open(&path)?, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes `frame` into a staging directory next to `path`, then renames the
/// result over `path`. The parent directory must already exist. A file that
/// already exists at `path` keeps its permissions; a new file gets the
/// process umask.
///
/// # Errors
///
/// Returns [`TableError::Io`] if the staging directory cannot be created,
/// [`TableError::DuckDb`] if serialization fails, or [`TableError::Persist`]
/// if the final rename fails. In every case `path` is left untouched.
pub fn write_csv_atomic(frame: &Frame, path: &Path) -> Result<(), TableError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let staging = tempfile::Builder::new().prefix(".staging-").tempdir_in(dir)?;
    let staged = staging.path().join("frame.csv");
    copy_to(frame, &staged)?;

    if let Ok(existing) = std::fs::metadata(path) {
        std::fs::set_permissions(&staged, existing.permissions())?;
    }
    std::fs::File::open(&staged)?.sync_all()?;

    std::fs::rename(&staged, path).map_err(|source| TableError::Persist {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Wrote {} rows to {}", frame.rows()?, path.display());
    Ok(())
}
