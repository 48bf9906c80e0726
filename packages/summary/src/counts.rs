//! Offer counts per city and per (city, property type).

use apartment_eda_listing_models::cleaned;
use apartment_eda_table::{Frame, TABLE};
use serde::{Deserialize, Serialize};

use crate::{SummaryError, require};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityCount {
    pub city: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityTypeCount {
    pub city: String,
    pub property_type: String,
    pub count: u64,
}

/// Offers per city, most offers first. Ties are ordered by city name.
/// Rows without a city are not counted.
///
/// # Errors
///
/// Returns [`SummaryError::MissingColumn`] if the city column is absent.
pub fn offers_per_city(frame: &Frame) -> Result<Vec<CityCount>, SummaryError> {
    let city = require(frame, cleaned::CITY)?;

    let mut stmt = frame.connection().prepare(&format!(
        "SELECT CAST({city} AS VARCHAR) AS c, count(*) AS n FROM {TABLE} \
         WHERE {city} IS NOT NULL \
         GROUP BY c ORDER BY n DESC, c ASC"
    ))?;
    let mut rows = stmt.query([])?;

    let mut counts = Vec::new();
    while let Some(row) = rows.next()? {
        counts.push(CityCount {
            city: row.get(0)?,
            count: u64::try_from(row.get::<_, i64>(1)?).unwrap_or(0),
        });
    }
    Ok(counts)
}

/// Offers per (city, property type), ordered by city then type.
///
/// # Errors
///
/// Returns [`SummaryError::MissingColumn`] if the city or property type
/// column is absent.
pub fn offers_per_city_and_type(frame: &Frame) -> Result<Vec<CityTypeCount>, SummaryError> {
    let city = require(frame, cleaned::CITY)?;
    let property_type = require(frame, cleaned::PROPERTY_TYPE)?;

    let mut stmt = frame.connection().prepare(&format!(
        "SELECT CAST({city} AS VARCHAR) AS c, CAST({property_type} AS VARCHAR) AS t, count(*) \
         FROM {TABLE} \
         WHERE {city} IS NOT NULL AND {property_type} IS NOT NULL \
         GROUP BY c, t ORDER BY c, t"
    ))?;
    let mut rows = stmt.query([])?;

    let mut counts = Vec::new();
    while let Some(row) = rows.next()? {
        counts.push(CityTypeCount {
            city: row.get(0)?,
            property_type: row.get(1)?,
            count: u64::try_from(row.get::<_, i64>(2)?).unwrap_or(0),
        });
    }
    Ok(counts)
}
