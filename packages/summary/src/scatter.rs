//! Pairwise scatter data over the numeric columns.

use apartment_eda_listing_models::{ColumnType, cleaned};
use apartment_eda_table::{Frame, TABLE};
use serde::{Deserialize, Serialize};

use crate::{SummaryError, numeric};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scatter {
    pub x: String,
    pub y: String,
    /// Rows where both values are present, in row order.
    pub points: Vec<ScatterPoint>,
}

/// Integer and float columns, in table order.
///
/// # Errors
///
/// Returns [`SummaryError::Table`] if the schema cannot be read.
pub fn numeric_columns(frame: &Frame) -> Result<Vec<String>, SummaryError> {
    Ok(frame
        .columns()?
        .into_iter()
        .filter(|c| c.column_type != ColumnType::Text)
        .map(|c| c.name)
        .collect())
}

fn pick<'a>(columns: &'a [String], name: &str, fallback: usize) -> &'a str {
    columns
        .iter()
        .find(|c| *c == name)
        .unwrap_or(&columns[fallback])
        .as_str()
}

/// Area on x and price on y when both are numeric, otherwise the first and
/// second numeric columns. `None` with fewer than two numeric columns.
#[must_use]
pub fn default_axes(columns: &[String]) -> Option<(&str, &str)> {
    if columns.len() < 2 {
        return None;
    }
    Some((
        pick(columns, cleaned::AREA_M2, 0),
        pick(columns, cleaned::PRICE, 1),
    ))
}

/// Points for `x` against `y`, each defaulting per [`default_axes`].
/// Returns `None` when the frame has fewer than two numeric columns.
///
/// # Errors
///
/// Returns [`SummaryError::MissingColumn`] or
/// [`SummaryError::NonNumericColumn`] for an unusable requested axis.
pub fn scatter(
    frame: &Frame,
    x: Option<&str>,
    y: Option<&str>,
) -> Result<Option<Scatter>, SummaryError> {
    let columns = numeric_columns(frame)?;
    let Some((default_x, default_y)) = default_axes(&columns) else {
        log::warn!("Fewer than two numeric columns; no scatter plot");
        return Ok(None);
    };
    let x = x.unwrap_or(default_x);
    let y = y.unwrap_or(default_y);

    let x_expr = numeric(frame, x)?;
    let y_expr = numeric(frame, y)?;

    let mut stmt = frame.connection().prepare(&format!(
        "SELECT {x_expr}, {y_expr} FROM {TABLE} \
         WHERE {x_expr} IS NOT NULL AND {y_expr} IS NOT NULL"
    ))?;
    let points = stmt
        .query_map([], |row| {
            Ok(ScatterPoint {
                x: row.get(0)?,
                y: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("Scatter {x} vs {y}: {} point(s)", points.len());
    Ok(Some(Scatter {
        x: x.to_string(),
        y: y.to_string(),
        points,
    }))
}

#[cfg(test)]
mod tests {
    use apartment_eda_table::read::read_csv_from;

    use super::*;
    use crate::fixtures;

    #[test]
    fn lists_numeric_columns_in_order() {
        assert_eq!(
            numeric_columns(&fixtures::frame()).unwrap(),
            vec![
                "id",
                "powierzchnia_m2",
                "szerokosc_geo",
                "dlugosc_geo",
                "cena",
                "cena_za_m2"
            ]
        );
    }

    #[test]
    fn defaults_to_area_against_price() {
        let plot = scatter(&fixtures::frame(), None, None).unwrap().unwrap();
        assert_eq!((plot.x.as_str(), plot.y.as_str()), ("powierzchnia_m2", "cena"));
        assert_eq!(plot.points.len(), 5);
        assert_eq!(plot.points[0], ScatterPoint { x: 50.0, y: 600_000.0 });
    }

    #[test]
    fn falls_back_to_first_two_numeric_columns() {
        let columns = vec!["a".to_string(), "b".to_string(), "cena".to_string()];
        assert_eq!(default_axes(&columns), Some(("a", "cena")));

        let columns = vec!["a".to_string(), "b".to_string()];
        assert_eq!(default_axes(&columns), Some(("a", "b")));
        assert_eq!(default_axes(&columns[..1]), None);
    }

    #[test]
    fn skips_rows_missing_either_value() {
        let frame = read_csv_from("a,b\n1,2\n,3\n4,\n5,6\n".as_bytes()).unwrap();
        let plot = scatter(&frame, Some("b"), Some("a")).unwrap().unwrap();
        assert_eq!(
            plot.points,
            vec![ScatterPoint { x: 2.0, y: 1.0 }, ScatterPoint { x: 6.0, y: 5.0 }]
        );
    }

    #[test]
    fn too_few_numeric_columns_means_no_plot() {
        let frame = read_csv_from("miasto,cena\nGdańsk,1\n".as_bytes()).unwrap();
        assert_eq!(scatter(&frame, None, None).unwrap(), None);
    }

    #[test]
    fn text_axis_is_rejected() {
        assert!(matches!(
            scatter(&fixtures::frame(), Some("miasto"), None),
            Err(SummaryError::NonNumericColumn(c)) if c == "miasto"
        ));
    }
}
