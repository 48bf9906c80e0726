//! City locations and the per-city offer map.

use apartment_eda_listing_models::cleaned;
use apartment_eda_table::{Frame, TABLE};
use serde::{Deserialize, Serialize};

use crate::{SummaryError, numeric, require};

/// City preselected on the map when present.
pub const DEFAULT_CITY: &str = "Warszawa";

/// Added to the price range so single-price cities do not divide by zero.
const INTENSITY_EPSILON: f64 = 1e-5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityLocation {
    pub city: String,
    /// Mean latitude of the city's offers, ignoring missing values.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub price: Option<f64>,
    /// Price scaled into `[0, 1)` relative to the city's price range.
    pub intensity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityMap {
    pub city: String,
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub offers: Vec<OfferPoint>,
}

/// Mean coordinates and offer count per city, ordered by city.
///
/// # Errors
///
/// Returns [`SummaryError::MissingColumn`] if the city or a coordinate
/// column is absent.
pub fn city_locations(frame: &Frame) -> Result<Vec<CityLocation>, SummaryError> {
    let city = require(frame, cleaned::CITY)?;
    let latitude = numeric(frame, cleaned::LATITUDE)?;
    let longitude = numeric(frame, cleaned::LONGITUDE)?;

    let mut stmt = frame.connection().prepare(&format!(
        "SELECT CAST({city} AS VARCHAR) AS c, avg({latitude}), avg({longitude}), count(*) \
         FROM {TABLE} WHERE {city} IS NOT NULL \
         GROUP BY c ORDER BY c"
    ))?;
    let mut rows = stmt.query([])?;

    let mut locations = Vec::new();
    while let Some(row) = rows.next()? {
        locations.push(CityLocation {
            city: row.get(0)?,
            latitude: row.get(1)?,
            longitude: row.get(2)?,
            count: u64::try_from(row.get::<_, i64>(3)?).unwrap_or(0),
        });
    }
    Ok(locations)
}

/// [`DEFAULT_CITY`] if listed, otherwise the first city. `cities` must be
/// sorted.
#[must_use]
pub fn default_city(cities: &[String]) -> Option<&str> {
    cities
        .iter()
        .find(|c| *c == DEFAULT_CITY)
        .or_else(|| cities.first())
        .map(String::as_str)
}

struct CityAggregate {
    offers: i64,
    missing_coordinates: i64,
    center: (Option<f64>, Option<f64>),
    price_range: Option<(f64, f64)>,
}

/// Every offer of `city` with its coordinates and price intensity.
///
/// # Errors
///
/// Returns [`SummaryError::UnknownCity`] if the city has no offers and
/// [`SummaryError::MissingCoordinates`] if any offer lacks coordinates.
pub fn city_map(frame: &Frame, city: &str) -> Result<CityMap, SummaryError> {
    let city_col = require(frame, cleaned::CITY)?;
    let latitude = numeric(frame, cleaned::LATITUDE)?;
    let longitude = numeric(frame, cleaned::LONGITUDE)?;
    let price = numeric(frame, cleaned::PRICE)?;
    let selected = format!("CAST({city_col} AS VARCHAR) = ?");

    let aggregate = frame.connection().query_row(
        &format!(
            "SELECT count(*), \
                    count(*) FILTER (WHERE {latitude} IS NULL OR {longitude} IS NULL), \
                    avg({latitude}), avg({longitude}), min({price}), max({price}) \
             FROM {TABLE} WHERE {selected}"
        ),
        [city],
        |row| {
            Ok(CityAggregate {
                offers: row.get(0)?,
                missing_coordinates: row.get(1)?,
                center: (row.get(2)?, row.get(3)?),
                price_range: row.get::<_, Option<f64>>(4)?.zip(row.get::<_, Option<f64>>(5)?),
            })
        },
    )?;

    if aggregate.offers == 0 {
        return Err(SummaryError::UnknownCity(city.to_string()));
    }
    let (0, (Some(center_latitude), Some(center_longitude))) =
        (aggregate.missing_coordinates, aggregate.center)
    else {
        return Err(SummaryError::MissingCoordinates {
            city: city.to_string(),
        });
    };

    let mut stmt = frame.connection().prepare(&format!(
        "SELECT {latitude}, {longitude}, {price} FROM {TABLE} WHERE {selected}"
    ))?;
    let mut rows = stmt.query([city])?;

    let mut offers = Vec::new();
    while let Some(row) = rows.next()? {
        let price: Option<f64> = row.get(2)?;
        offers.push(OfferPoint {
            latitude: row.get(0)?,
            longitude: row.get(1)?,
            price,
            intensity: price
                .zip(aggregate.price_range)
                .map(|(p, (min, max))| (p - min) / (max - min + INTENSITY_EPSILON)),
        });
    }

    Ok(CityMap {
        city: city.to_string(),
        center_latitude,
        center_longitude,
        offers,
    })
}
