//! Price-per-square-metre statistics.

use apartment_eda_listing_models::cleaned;
use apartment_eda_table::{Frame, stats};
use serde::{Deserialize, Serialize};

use crate::{SummaryError, numeric, round2};

/// Values at or above this are treated as outliers and excluded.
pub const PRICE_PER_M2_CAP: f64 = 30_000.0;

/// Statistics rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceStats {
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
    /// Sample standard deviation; `None` with fewer than two offers.
    pub std: Option<f64>,
    pub count: u64,
}

/// Statistics over present, finite `cena_za_m2` values below
/// [`PRICE_PER_M2_CAP`]. Returns `None` when no value qualifies.
///
/// # Errors
///
/// Returns [`SummaryError::MissingColumn`] if the column is absent and
/// [`SummaryError::NonNumericColumn`] if it holds text.
pub fn price_per_m2_stats(frame: &Frame) -> Result<Option<PriceStats>, SummaryError> {
    numeric(frame, cleaned::PRICE_PER_M2)?;
    let summary = stats::summarize(
        frame,
        cleaned::PRICE_PER_M2,
        Some(&format!("isfinite(v) AND v < {PRICE_PER_M2_CAP}")),
    )?;

    let (Some(mean), Some(median), Some(max), Some(min)) =
        (summary.mean, summary.median, summary.max, summary.min)
    else {
        return Ok(None);
    };

    Ok(Some(PriceStats {
        mean: round2(mean),
        median: round2(median),
        max: round2(max),
        min: round2(min),
        std: summary.std.map(round2),
        count: summary.count,
    }))
}
