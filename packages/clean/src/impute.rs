//! Missing-value imputation.
//!
//! Numeric gaps in [`raw::MEDIAN_IMPUTED_COLUMNS`] are filled with the
//! column median; categorical gaps in [`raw::UNKNOWN_IMPUTED_COLUMNS`] are
//! filled with [`UNKNOWN_CATEGORY`].

use apartment_eda_listing_models::{PipelineStep, UNKNOWN_CATEGORY, raw};
use apartment_eda_table::{Frame, stats};

use crate::CleanError;

/// Fills missing values of the median-imputed columns.
///
/// Medians are computed from the values present before filling. A column
/// with no present values has no median: it is left as is and its name is
/// returned so the caller can flag it.
///
/// # Errors
///
/// Returns [`CleanError::MissingColumn`] if a column is absent and
/// [`CleanError::NonNumericColumn`] if it holds text.
pub fn impute_medians(frame: &mut Frame) -> Result<Vec<String>, CleanError> {
    let table_err = |e| CleanError::table(PipelineStep::NumericImputation, e);
    let mut unimputed = Vec::new();

    for name in raw::MEDIAN_IMPUTED_COLUMNS {
        if !frame.has_column(name).map_err(table_err)? {
            return Err(CleanError::MissingColumn {
                step: PipelineStep::NumericImputation,
                column: name.to_string(),
            });
        }

        let missing = frame.missing_count(name).map_err(table_err)?;
        if missing == 0 {
            continue;
        }

        if frame.numeric_expr(name).map_err(table_err)?.is_none() {
            return Err(CleanError::NonNumericColumn {
                column: name.to_string(),
            });
        }

        let Some(median) = stats::median(frame, name).map_err(table_err)? else {
            log::warn!(
                "ImputationWarning: column '{name}' has no values, median is undefined; leaving it empty"
            );
            unimputed.push(name.to_string());
            continue;
        };

        log::info!("{name}: filling {missing} missing value(s) with median {median}");
        frame.fill_null_f64(name, median).map_err(table_err)?;
    }

    Ok(unimputed)
}

/// Replaces missing values of the categorical columns with
/// [`UNKNOWN_CATEGORY`]. Present values are kept as text.
///
/// # Errors
///
/// Returns [`CleanError::MissingColumn`] if a column is absent.
pub fn fill_unknown_categories(frame: &mut Frame) -> Result<(), CleanError> {
    let table_err = |e| CleanError::table(PipelineStep::CategoricalImputation, e);

    for name in raw::UNKNOWN_IMPUTED_COLUMNS {
        if !frame.has_column(name).map_err(table_err)? {
            return Err(CleanError::MissingColumn {
                step: PipelineStep::CategoricalImputation,
                column: name.to_string(),
            });
        }

        let missing = frame.missing_count(name).map_err(table_err)?;
        if missing == 0 {
            continue;
        }

        log::debug!("{name}: {missing} missing value(s) set to '{UNKNOWN_CATEGORY}'");
        frame.fill_null_text(name, UNKNOWN_CATEGORY).map_err(table_err)?;
    }
    Ok(())
}
