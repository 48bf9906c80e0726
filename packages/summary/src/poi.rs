//! Points of interest shown next to a city's offers.
//!
//! Each category lives in its own CSV under the data directory with at least
//! `miasto`, `szerokosc_geo` and `dlugosc_geo` columns and an optional
//! `name`. The files are auxiliary: a category that cannot be loaded is
//! skipped with a warning instead of failing the whole report.

use std::path::{Path, PathBuf};

use apartment_eda_listing_models::cleaned;
use apartment_eda_table::{Frame, TABLE, TableError, ident, read::read_csv};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

#[derive(Debug, thiserror::Error)]
pub enum PoiError {
    #[error("cannot load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: TableError,
    },
    #[error("{} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },
}

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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PoiCategory {
    Pharmacies,
    Schools,
    Restaurants,
    Kindergartens,
    Offices,
    PostOffices,
    Hospitals,
    Universities,
}

impl PoiCategory {
    pub const ALL: &[Self] = &[
        Self::Pharmacies,
        Self::Schools,
        Self::Restaurants,
        Self::Kindergartens,
        Self::Offices,
        Self::PostOffices,
        Self::Hospitals,
        Self::Universities,
    ];

    /// Layer name shown on the map.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pharmacies => "Apteki",
            Self::Schools => "Szkoły",
            Self::Restaurants => "Restauracje",
            Self::Kindergartens => "Przedszkola",
            Self::Offices => "Urzędy",
            Self::PostOffices => "Poczta",
            Self::Hospitals => "Szpitale i przychodnie",
            Self::Universities => "Szkoły wyższe",
        }
    }

    #[must_use]
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Pharmacies => "poi_apteki.csv",
            Self::Schools => "poi_szkoly.csv",
            Self::Restaurants => "poi_restauracje.csv",
            Self::Kindergartens => "poi_przedszkola.csv",
            Self::Offices => "poi_urzedy.csv",
            Self::PostOffices => "poi_poczta.csv",
            Self::Hospitals => "poi_szpitale.csv",
            Self::Universities => "poi_uczelnie.csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiLayer {
    pub category: PoiCategory,
    pub label: String,
    pub points: Vec<PoiPoint>,
}

fn column_expr(frame: &Frame, path: &Path, name: &str, numeric: bool) -> Result<String, PoiError> {
    let load_err = |source| PoiError::Load {
        path: path.to_path_buf(),
        source,
    };
    let missing = || PoiError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
    };

    if !frame.has_column(name).map_err(load_err)? {
        return Err(missing());
    }
    if numeric {
        frame.numeric_expr(name).map_err(load_err)?.ok_or_else(missing)
    } else {
        Ok(format!("CAST({} AS VARCHAR)", ident(name)))
    }
}

type PointRow = (Option<String>, Option<f64>, Option<f64>);

fn query_points(frame: &Frame, sql: &str, city: &str) -> duckdb::Result<Vec<PointRow>> {
    let mut stmt = frame.connection().prepare(sql)?;
    let rows = stmt.query_map([city], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
    rows.collect()
}

/// Loads the points of one category located in `city`. Points without
/// coordinates are left out; points without a name take the category
/// label.
///
/// # Errors
///
/// Returns [`PoiError`] if the file cannot be read or lacks the city or a
/// numeric coordinate column.
pub fn load_layer(
    data_dir: &Path,
    category: PoiCategory,
    city: &str,
) -> Result<PoiLayer, PoiError> {
    let path = data_dir.join(category.file_name());
    let load_err = |source: TableError| PoiError::Load {
        path: path.clone(),
        source,
    };
    let frame = read_csv(&path).map_err(load_err)?;

    let city_col = column_expr(&frame, &path, cleaned::CITY, false)?;
    let latitude = column_expr(&frame, &path, cleaned::LATITUDE, true)?;
    let longitude = column_expr(&frame, &path, cleaned::LONGITUDE, true)?;
    let name = if frame.has_column(cleaned::POI_NAME).map_err(load_err)? {
        column_expr(&frame, &path, cleaned::POI_NAME, false)?
    } else {
        "NULL".to_string()
    };

    let sql = format!("SELECT {name}, {latitude}, {longitude} FROM {TABLE} WHERE {city_col} = ?");
    let rows = query_points(&frame, &sql, city).map_err(|e| load_err(e.into()))?;

    let mut points = Vec::new();
    let mut skipped = 0_usize;
    for (name, latitude, longitude) in rows {
        let Some((latitude, longitude)) = latitude.zip(longitude) else {
            skipped += 1;
            continue;
        };
        points.push(PoiPoint {
            name: name.unwrap_or_else(|| category.label().to_string()),
            latitude,
            longitude,
        });
    }

    if skipped > 0 {
        log::debug!(
            "{}: {skipped} point(s) in {city} without coordinates",
            path.display()
        );
    }

    Ok(PoiLayer {
        category,
        label: category.label().to_string(),
        points,
    })
}

/// Loads every category for `city`, skipping the ones that fail.
#[must_use]
pub fn load_layers(data_dir: &Path, city: &str) -> Vec<PoiLayer> {
    PoiCategory::ALL
        .iter()
        .filter_map(|&category| match load_layer(data_dir, category, city) {
            Ok(layer) => Some(layer),
            Err(e) => {
                log::warn!("AuxiliaryLoadWarning: skipping {}: {e}", category.label());
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, category: PoiCategory, content: &str) {
        std::fs::write(dir.path().join(category.file_name()), content).unwrap();
    }

    #[test]
    fn categories_have_distinct_files() {
        let mut files: Vec<&str> = PoiCategory::ALL.iter().map(PoiCategory::file_name).collect();
        files.sort_unstable();
        files.dedup();
        assert_eq!(files.len(), 8);
        assert_eq!(PoiCategory::Hospitals.label(), "Szpitale i przychodnie");
    }

    #[test]
    fn filters_by_city_and_defaults_names() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            PoiCategory::Pharmacies,
            "miasto,szerokosc_geo,dlugosc_geo,name\n\
             Warszawa,52.2,21.0,Apteka Centralna\n\
             Warszawa,52.3,21.1,\n\
             Kraków,50.0,19.9,Apteka Rynek\n\
             Warszawa,,21.2,Bez pozycji\n",
        );

        let layer = load_layer(dir.path(), PoiCategory::Pharmacies, "Warszawa").unwrap();

        let names: Vec<&str> = layer.points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Apteka Centralna", "Apteki"]);
        assert_eq!(layer.label, "Apteki");
    }

    #[test]
    fn name_column_is_optional() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            PoiCategory::PostOffices,
            "miasto,szerokosc_geo,dlugosc_geo\nGdańsk,54.3,18.6\n",
        );
        let layer = load_layer(dir.path(), PoiCategory::PostOffices, "Gdańsk").unwrap();
        assert_eq!(layer.points[0].name, "Poczta");
    }

    #[test]
    fn missing_city_column_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, PoiCategory::Schools, "szerokosc_geo,dlugosc_geo\n1,2\n");
        assert!(matches!(
            load_layer(dir.path(), PoiCategory::Schools, "Gdańsk"),
            Err(PoiError::MissingColumn { column, .. }) if column == cleaned::CITY
        ));
    }

    #[test]
    fn failing_categories_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            PoiCategory::Schools,
            "miasto,szerokosc_geo,dlugosc_geo\nGdańsk,54.3,18.6\n",
        );
        write(&dir, PoiCategory::Restaurants, "miasto\nGdańsk\n");

        let layers = load_layers(dir.path(), "Gdańsk");

        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].category, PoiCategory::Schools);
    }
}
