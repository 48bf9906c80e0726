//! CSV loading with per-column type inference.
//!
//! Every field is first read as text, with empty fields and the usual null
//! tokens read as missing. Each column then becomes an integer column when
//! every cell is present and parses as an integer, a float column when
//! every present cell parses as a number (an entirely empty column is a
//! float column), and stays text otherwise. Header-only files keep text
//! columns.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{ColumnType, Frame, TABLE, TableError, ident, literal};

/// Field values read as missing.
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Reads a comma-separated file with a header row.
///
/// # Errors
///
/// Returns [`TableError::Open`] if the file cannot be opened and
/// [`TableError::DuckDb`] if its contents are not a valid table.
pub fn read_csv(path: &Path) -> Result<Frame, TableError> {
    File::open(path).map_err(|source| TableError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let frame = Frame::open()?;
    let null_tokens = NULL_TOKENS
        .iter()
        .map(|token| literal(token))
        .collect::<Vec<_>>()
        .join(", ");

    frame.conn.execute_batch(&format!(
        "CREATE TABLE {TABLE} AS SELECT * FROM read_csv({path}, \
         header = true, delim = ',', quote = '\"', escape = '\"', \
         all_varchar = true, nullstr = [{null_tokens}])",
        path = literal(&path.to_string_lossy()),
    ))?;

    infer_types(&frame)?;

    log::debug!(
        "Read {} rows x {} columns from {}",
        frame.rows()?,
        frame.columns()?.len(),
        path.display()
    );
    Ok(frame)
}

/// Reads comma-separated data with a header row from any reader.
///
/// # Errors
///
/// See [`read_csv`].
pub fn read_csv_from<R: Read>(mut reader: R) -> Result<Frame, TableError> {
    let mut staged = tempfile::Builder::new().suffix(".csv").tempfile()?;
    std::io::copy(&mut reader, staged.as_file_mut())?;
    read_csv(staged.path())
}

struct Profile {
    missing: i64,
    non_int: i64,
    non_float: i64,
}

fn profile(frame: &Frame, name: &str) -> Result<Profile, TableError> {
    let col = ident(name);
    let profile = frame.conn.query_row(
        &format!(
            "SELECT count(*) - count({col}), \
             count(*) FILTER (WHERE {col} IS NOT NULL AND (\
                 NOT regexp_full_match(trim({col}), '[+-]?[0-9]+') \
                 OR TRY_CAST(trim({col}) AS BIGINT) IS NULL)), \
             count(*) FILTER (WHERE {col} IS NOT NULL \
                 AND TRY_CAST(trim({col}) AS DOUBLE) IS NULL) \
             FROM {TABLE}"
        ),
        [],
        |row| {
            Ok(Profile {
                missing: row.get(0)?,
                non_int: row.get(1)?,
                non_float: row.get(2)?,
            })
        },
    )?;
    Ok(profile)
}

/// Narrows each text column to the smallest storage type that holds every
/// present value.
fn infer_types(frame: &Frame) -> Result<(), TableError> {
    if frame.rows()? == 0 {
        return Ok(());
    }

    for column in frame.columns()? {
        let Profile {
            missing,
            non_int,
            non_float,
        } = profile(frame, &column.name)?;

        let narrowed = if missing == 0 && non_int == 0 {
            Some(("BIGINT", ColumnType::Int))
        } else if non_float == 0 {
            Some(("DOUBLE", ColumnType::Float))
        } else {
            None
        };

        if let Some((sql_type, column_type)) = narrowed {
            let col = ident(&column.name);
            frame.conn.execute_batch(&format!(
                "ALTER TABLE {TABLE} ALTER {col} TYPE {sql_type} \
                 USING CAST(trim({col}) AS {sql_type})"
            ))?;
            log::trace!("{}: {column_type}", column.name);
        }
    }
    Ok(())
}
