//! Headline numbers for the whole dataset.

use apartment_eda_listing_models::cleaned;
use apartment_eda_table::{Frame, stats};
use serde::{Deserialize, Serialize};

use crate::{SummaryError, cities, numeric};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub records: u64,
    pub cities: Vec<String>,
    pub area_min: Option<f64>,
    pub area_max: Option<f64>,
    /// Most common area; the smallest wins a tie.
    pub area_mode: Option<f64>,
}

/// Record count, sorted distinct cities, and the area range and mode.
///
/// # Errors
///
/// Returns [`SummaryError::MissingColumn`] if the city or area column is
/// absent and [`SummaryError::NonNumericColumn`] if the area column holds
/// text.
pub fn overview(frame: &Frame) -> Result<Overview, SummaryError> {
    numeric(frame, cleaned::AREA_M2)?;
    let areas = stats::summarize(frame, cleaned::AREA_M2, None)?;

    Ok(Overview {
        records: frame.rows()?,
        cities: cities(frame)?,
        area_min: areas.min,
        area_max: areas.max,
        area_mode: stats::mode(frame, cleaned::AREA_M2)?,
    })
}
