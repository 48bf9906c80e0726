#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Exploratory statistics over the cleaned listings file.
//!
//! Everything here reads the Polish-named columns written by the cleaning
//! pipeline. Results are plain serde structs; rendering is left to callers
//! (see [`report`] for the text form used by the CLI).

pub mod counts;
pub mod geo;
pub mod overview;
pub mod poi;
pub mod price;
pub mod report;
pub mod scatter;

use std::path::{Path, PathBuf};

use apartment_eda_listing_models::cleaned;
use apartment_eda_table::{Frame, TABLE, TableError, ident, read::read_csv};

/// Errors raised while summarizing the cleaned dataset.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    /// The cleaned file could not be read.
    #[error("cannot load cleaned data from {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    /// A column the summary needs is absent.
    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    /// A column the summary reads as numbers holds text.
    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),

    /// The dataset has no city to select.
    #[error("dataset contains no cities")]
    NoCities,

    /// The requested city has no offers.
    #[error("no offers for city '{0}'")]
    UnknownCity(String),

    /// Some offers of the city have no coordinates, so no map can be drawn.
    #[error("offers in '{city}' are missing coordinates")]
    MissingCoordinates { city: String },

    #[error(transparent)]
    Table(#[from] TableError),
}

impl From<duckdb::Error> for SummaryError {
    fn from(e: duckdb::Error) -> Self {
        Self::Table(e.into())
    }
}

/// Loads the cleaned listings file.
///
/// # Errors
///
/// Returns [`SummaryError::Load`] if the file is missing or malformed.
pub fn load(path: &Path) -> Result<Frame, SummaryError> {
    read_csv(path).map_err(|source| SummaryError::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Quoted name of `name`, or [`SummaryError::MissingColumn`].
pub(crate) fn require(frame: &Frame, name: &str) -> Result<String, SummaryError> {
    if frame.has_column(name)? {
        Ok(ident(name))
    } else {
        Err(SummaryError::MissingColumn(name.to_string()))
    }
}

/// SQL expression reading `name` as numbers.
pub(crate) fn numeric(frame: &Frame, name: &str) -> Result<String, SummaryError> {
    require(frame, name)?;
    frame
        .numeric_expr(name)?
        .ok_or_else(|| SummaryError::NonNumericColumn(name.to_string()))
}

/// Distinct present cities, sorted.
///
/// # Errors
///
/// Returns [`SummaryError::MissingColumn`] if the city column is absent.
pub fn cities(frame: &Frame) -> Result<Vec<String>, SummaryError> {
    let city = require(frame, cleaned::CITY)?;
    let mut stmt = frame.connection().prepare(&format!(
        "SELECT DISTINCT CAST({city} AS VARCHAR) AS c FROM {TABLE} \
         WHERE {city} IS NOT NULL ORDER BY c"
    ))?;
    let cities = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cities)
}

/// Rounds half to even at two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
pub(crate) mod fixtures {
    use apartment_eda_table::{Frame, read::read_csv_from};

    pub const CLEANED: &str = "\
id,miasto,typ_nieruchomosci,powierzchnia_m2,szerokosc_geo,dlugosc_geo,cena,cena_za_m2
1,Warszawa,blockOfFlats,50.0,52.20,21.00,600000,12000.0
2,Kraków,apartmentBuilding,40.0,50.06,19.94,400000,10000.0
3,Warszawa,apartmentBuilding,60.0,52.30,21.10,900000,15000.0
4,Łódź,unknown,50.0,51.76,19.45,300000,6000.0
5,Kraków,blockOfFlats,35.0,50.04,19.96,1400000,40000.0
";

    pub fn frame() -> Frame {
        read_csv_from(CLEANED.as_bytes()).unwrap()
    }
}
