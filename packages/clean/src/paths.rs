#![allow(clippy::module_name_repetitions)]
//! Default file locations for the dataset.
//!
//! Paths are relative to the working directory unless overridden through
//! environment variables. Explicit paths passed on the command line take
//! precedence over both.

use std::path::{Path, PathBuf};

/// Overrides the raw input CSV path.
pub const RAW_PATH_ENV: &str = "APARTMENT_EDA_RAW_PATH";
/// Overrides the cleaned output CSV path.
pub const CLEANED_PATH_ENV: &str = "APARTMENT_EDA_CLEANED_PATH";
/// Overrides the `data/` directory (also where POI files live).
pub const DATA_DIR_ENV: &str = "APARTMENT_EDA_DATA_DIR";

/// Returns the `data/` directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV).map_or_else(|| PathBuf::from("data"), PathBuf::from)
}

/// Returns the raw listings CSV path.
#[must_use]
pub fn raw_data_path() -> PathBuf {
    std::env::var_os(RAW_PATH_ENV).map_or_else(
        || data_dir().join("raw").join("apartments_pl_2024_06.csv"),
        PathBuf::from,
    )
}

/// Returns the cleaned listings CSV path.
#[must_use]
pub fn cleaned_data_path() -> PathBuf {
    std::env::var_os(CLEANED_PATH_ENV).map_or_else(
        || data_dir().join("processed").join("apartments_cleaned.csv"),
        PathBuf::from,
    )
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let tmp = tempfile::TempDir::new().unwrap();
        let nested = tmp.path().join("data").join("processed");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn default_paths_live_under_data_dir() {
        if std::env::var_os(DATA_DIR_ENV).is_some()
            || std::env::var_os(RAW_PATH_ENV).is_some()
            || std::env::var_os(CLEANED_PATH_ENV).is_some()
        {
            return;
        }
        assert_eq!(
            raw_data_path(),
            Path::new("data/raw/apartments_pl_2024_06.csv")
        );
        assert_eq!(
            cleaned_data_path(),
            Path::new("data/processed/apartments_cleaned.csv")
        );
    }
}
