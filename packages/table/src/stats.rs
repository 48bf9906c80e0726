//! Descriptive statistics over the present values of a column, computed by
//! the engine.
//!
//! All functions skip missing cells and return `None` when there is
//! nothing to aggregate.

use crate::{Frame, TABLE, TableError};

/// Aggregates over the present values of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericSummary {
    pub count: u64,
    pub mean: Option<f64>,
    /// Even-sized inputs average the two middle values.
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Sample standard deviation (`n - 1` denominator); needs two values.
    pub std: Option<f64>,
}

fn value_expr(frame: &Frame, column: &str) -> Result<String, TableError> {
    frame
        .numeric_expr(column)?
        .ok_or_else(|| TableError::NotNumeric(column.to_string()))
}

/// Summarizes the present values of `column`. `predicate`, when given, is
/// a SQL condition over the value `v` that further restricts the rows.
///
/// # Errors
///
/// Returns [`TableError::UnknownColumn`] or [`TableError::NotNumeric`] for
/// an unusable column and [`TableError::DuckDb`] if the query fails.
pub fn summarize(
    frame: &Frame,
    column: &str,
    predicate: Option<&str>,
) -> Result<NumericSummary, TableError> {
    let expr = value_expr(frame, column)?;
    let predicate = predicate.unwrap_or("true");

    let summary = frame.connection().query_row(
        &format!(
            "SELECT count(v), avg(v), median(v), min(v), max(v), stddev_samp(v) \
             FROM (SELECT {expr} AS v FROM {TABLE}) \
             WHERE v IS NOT NULL AND ({predicate})"
        ),
        [],
        |row| {
            Ok(NumericSummary {
                count: crate::count(row.get(0)?),
                mean: row.get(1)?,
                median: row.get(2)?,
                min: row.get(3)?,
                max: row.get(4)?,
                std: row.get(5)?,
            })
        },
    )?;
    Ok(summary)
}

/// Median of the present values of `column`.
///
/// # Errors
///
/// See [`summarize`].
pub fn median(frame: &Frame, column: &str) -> Result<Option<f64>, TableError> {
    let expr = value_expr(frame, column)?;
    let median = frame.connection().query_row(
        &format!("SELECT median({expr}) FROM {TABLE}"),
        [],
        |row| row.get(0),
    )?;
    Ok(median)
}

/// Most frequent present value of `column`; the smallest one wins a tie.
///
/// # Errors
///
/// See [`summarize`].
pub fn mode(frame: &Frame, column: &str) -> Result<Option<f64>, TableError> {
    let expr = value_expr(frame, column)?;
    let result = frame.connection().query_row(
        &format!(
            "SELECT v FROM (SELECT {expr} AS v FROM {TABLE}) \
             WHERE v IS NOT NULL \
             GROUP BY v ORDER BY count(*) DESC, v ASC LIMIT 1"
        ),
        [],
        |row| row.get::<_, f64>(0),
    );

    match result {
        Ok(value) => Ok(Some(value)),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
