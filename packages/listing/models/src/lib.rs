#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Listing column vocabulary, cleaning configuration, and report types.
//!
//! The raw dataset uses English camelCase column names (see [`raw`]). The
//! cleaning pipeline renames them to the Polish vocabulary in [`cleaned`],
//! which is what every downstream consumer reads.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Column names of the raw listings dataset.
pub mod raw {
    pub const ID: &str = "id";
    pub const CITY: &str = "city";
    pub const TYPE: &str = "type";
    pub const SQUARE_METERS: &str = "squareMeters";
    pub const FLOOR: &str = "floor";
    pub const FLOOR_COUNT: &str = "floorCount";
    pub const BUILD_YEAR: &str = "buildYear";
    pub const PRICE: &str = "price";
    pub const BUILDING_MATERIAL: &str = "buildingMaterial";
    pub const CONDITION: &str = "condition";
    pub const HAS_PARKING_SPACE: &str = "hasParkingSpace";
    pub const HAS_BALCONY: &str = "hasBalcony";
    pub const HAS_ELEVATOR: &str = "hasElevator";
    pub const HAS_SECURITY: &str = "hasSecurity";
    pub const HAS_STORAGE_ROOM: &str = "hasStorageRoom";

    /// Derived `ln(1 + price)` column.
    pub const PRICE_LOG: &str = "price_log";
    /// Derived `price / squareMeters` column.
    pub const PRICE_PER_M2: &str = "price_per_m2";

    /// Columns encoded as literal `"yes"` / `"no"` strings.
    pub const BOOLEAN_COLUMNS: [&str; 5] = [
        HAS_PARKING_SPACE,
        HAS_BALCONY,
        HAS_ELEVATOR,
        HAS_SECURITY,
        HAS_STORAGE_ROOM,
    ];

    /// Numeric columns whose missing values are filled with the median.
    pub const MEDIAN_IMPUTED_COLUMNS: [&str; 3] = [FLOOR, FLOOR_COUNT, BUILD_YEAR];

    /// Categorical columns whose missing values become [`super::UNKNOWN_CATEGORY`].
    pub const UNKNOWN_IMPUTED_COLUMNS: [&str; 3] = [TYPE, BUILDING_MATERIAL, CONDITION];
}

/// Column names of the cleaned dataset read by the dashboard.
pub mod cleaned {
    pub const ID: &str = "id";
    pub const CITY: &str = "miasto";
    pub const PROPERTY_TYPE: &str = "typ_nieruchomosci";
    pub const AREA_M2: &str = "powierzchnia_m2";
    pub const FLOOR: &str = "pietro";
    pub const BUILD_YEAR: &str = "rok_budowy";
    pub const LATITUDE: &str = "szerokosc_geo";
    pub const LONGITUDE: &str = "dlugosc_geo";
    pub const BALCONY: &str = "balkon";
    pub const PRICE: &str = "cena";
    pub const PRICE_LOG: &str = "cena_log";
    pub const PRICE_PER_M2: &str = "cena_za_m2";
    /// Optional point label column in the POI files.
    pub const POI_NAME: &str = "name";
}

/// Category written into empty categorical cells.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Storage type of a column.
///
/// The string forms follow the dtype names analysts already know from the
/// notebook tooling, so diagnostics read the same in both places.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ColumnType {
    /// Nullable 64-bit integers.
    #[strum(serialize = "int64")]
    #[serde(rename = "int64")]
    Int,
    /// Nullable 64-bit floats.
    #[strum(serialize = "float64")]
    #[serde(rename = "float64")]
    Float,
    /// Nullable free text.
    #[strum(serialize = "object")]
    #[serde(rename = "object")]
    Text,
}

/// What to do with raw columns that have no entry in the rename table.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UnmappedColumns {
    /// Keep the column under its original name.
    #[default]
    Keep,
    /// Remove the column from the output.
    Drop,
}

/// The nine ordered steps of the cleaning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    #[strum(serialize = "load")]
    Load,
    #[strum(serialize = "diagnostics")]
    Diagnostics,
    #[strum(serialize = "boolean normalization")]
    Booleans,
    #[strum(serialize = "city canonicalization")]
    Cities,
    #[strum(serialize = "numeric imputation")]
    NumericImputation,
    #[strum(serialize = "categorical imputation")]
    CategoricalImputation,
    #[strum(serialize = "derived columns")]
    DerivedColumns,
    #[strum(serialize = "rename")]
    Rename,
    #[strum(serialize = "persist")]
    Persist,
}

impl PipelineStep {
    pub const ALL: &[Self] = &[
        Self::Load,
        Self::Diagnostics,
        Self::Booleans,
        Self::Cities,
        Self::NumericImputation,
        Self::CategoricalImputation,
        Self::DerivedColumns,
        Self::Rename,
        Self::Persist,
    ];
}

/// Configuration for one cleaning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanConfig {
    /// Raw listings CSV.
    pub input: PathBuf,
    /// Destination of the cleaned CSV. Overwritten on success.
    pub output: PathBuf,
    /// Whether to derive the price-per-square-metre column.
    pub price_per_m2: bool,
    /// Policy for columns missing from the rename table.
    pub unmapped: UnmappedColumns,
}

impl CleanConfig {
    /// Creates a config with the default column policies.
    #[must_use]
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            price_per_m2: true,
            unmapped: UnmappedColumns::default(),
        }
    }
}

/// Data type of a single column, as reported by diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDtype {
    pub column: String,
    pub dtype: ColumnType,
}

/// Number of columns stored as one dtype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtypeCount {
    pub dtype: ColumnType,
    pub count: u64,
}

/// Missing-value count for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingValues {
    pub column: String,
    pub count: u64,
    /// Share of rows that are missing, 0-100.
    pub percent: f64,
}

/// Informational report about a loaded table. Never alters data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub rows: u64,
    pub columns: u64,
    pub dtypes: Vec<ColumnDtype>,
    /// Columns per dtype, most common first.
    pub dtype_counts: Vec<DtypeCount>,
    /// Rows identical to an earlier row in every column.
    pub duplicate_rows: u64,
    /// Columns with at least one missing value, by percentage descending.
    pub missing: Vec<MissingValues>,
}

/// Result of a completed cleaning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Rows written (always equal to rows read).
    pub rows: u64,
    /// Output header, in order.
    pub columns: Vec<String>,
    /// Median-imputed columns that had no present values and stayed empty.
    pub unimputed_columns: Vec<String>,
    /// `None` when diagnostics could not be computed.
    pub diagnostics: Option<Diagnostics>,
    pub duration: Duration,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn column_type_uses_dtype_names() {
        assert_eq!(ColumnType::Int.to_string(), "int64");
        assert_eq!(ColumnType::Float.to_string(), "float64");
        assert_eq!(ColumnType::Text.to_string(), "object");
    }

    #[test]
    fn unmapped_policy_parses_from_cli_strings() {
        assert_eq!(UnmappedColumns::from_str("keep").unwrap(), UnmappedColumns::Keep);
        assert_eq!(UnmappedColumns::from_str("drop").unwrap(), UnmappedColumns::Drop);
        assert!(UnmappedColumns::from_str("rename").is_err());
    }

    #[test]
    fn pipeline_has_nine_steps_in_order() {
        assert_eq!(PipelineStep::ALL.len(), 9);
        assert_eq!(PipelineStep::ALL[0], PipelineStep::Load);
        assert_eq!(PipelineStep::ALL[8], PipelineStep::Persist);
        assert_eq!(PipelineStep::DerivedColumns.to_string(), "derived columns");
    }

    #[test]
    fn default_config_derives_price_per_m2() {
        let config = CleanConfig::new("in.csv", "out.csv");
        assert!(config.price_per_m2);
        assert_eq!(config.unmapped, UnmappedColumns::Keep);
    }
}
