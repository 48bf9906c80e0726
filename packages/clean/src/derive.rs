//! Derived price columns.

use apartment_eda_listing_models::{PipelineStep, raw};
use apartment_eda_table::{ColumnType, Frame, TABLE};

use crate::CleanError;

/// SQL expression reading a numeric source column for a derived column.
fn numeric_source(frame: &Frame, source: &str, target: &str) -> Result<String, CleanError> {
    let derived_err = |message: String| CleanError::DerivedColumn {
        column: target.to_string(),
        message,
    };

    if !frame
        .has_column(source)
        .map_err(|e| CleanError::table(PipelineStep::DerivedColumns, e))?
    {
        return Err(derived_err(format!("source column '{source}' is missing")));
    }
    frame
        .numeric_expr(source)
        .map_err(|e| CleanError::table(PipelineStep::DerivedColumns, e))?
        .ok_or_else(|| derived_err(format!("source column '{source}' is not numeric")))
}

/// `ln(1 + price)`. Missing prices yield missing values.
///
/// # Errors
///
/// Returns [`CleanError::DerivedColumn`] if `price` is absent, non-numeric,
/// or contains a value at or below -1 (no finite logarithm).
pub fn add_price_log(frame: &mut Frame) -> Result<(), CleanError> {
    let table_err = |e| CleanError::table(PipelineStep::DerivedColumns, e);
    let price = numeric_source(frame, raw::PRICE, raw::PRICE_LOG)?;

    let first_bad: Option<f64> = frame
        .connection()
        .query_row(
            &format!(
                "SELECT min(p) FROM (SELECT {price} AS p FROM {TABLE}) \
                 WHERE p <= -1 OR NOT isfinite(p)"
            ),
            [],
            |row| row.get(0),
        )
        .map_err(|e| table_err(e.into()))?;

    if let Some(p) = first_bad {
        return Err(CleanError::DerivedColumn {
            column: raw::PRICE_LOG.to_string(),
            message: format!("price {p} has no finite ln(1 + price)"),
        });
    }

    frame
        .add_column(raw::PRICE_LOG, ColumnType::Float, &format!("ln(1 + {price})"))
        .map_err(table_err)
}

/// `price / squareMeters`. Rows with a missing price, or a missing or zero
/// area, yield missing values.
///
/// # Errors
///
/// Returns [`CleanError::DerivedColumn`] if either source column is absent
/// or non-numeric.
pub fn add_price_per_m2(frame: &mut Frame) -> Result<(), CleanError> {
    let table_err = |e| CleanError::table(PipelineStep::DerivedColumns, e);
    let price = numeric_source(frame, raw::PRICE, raw::PRICE_PER_M2)?;
    let area = numeric_source(frame, raw::SQUARE_METERS, raw::PRICE_PER_M2)?;

    frame
        .add_column(
            raw::PRICE_PER_M2,
            ColumnType::Float,
            &format!(
                "CASE WHEN {area} <> 0 AND isfinite({price} / {area}) \
                 THEN {price} / {area} END"
            ),
        )
        .map_err(table_err)?;

    let undefined = frame.missing_count(raw::PRICE_PER_M2).map_err(table_err)?;
    if undefined > 0 {
        log::debug!("{}: {undefined} row(s) without a defined value", raw::PRICE_PER_M2);
    }
    Ok(())
}
