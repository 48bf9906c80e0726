//! Aggregated reports and their plain-text rendering.

use std::fmt::Write as _;
use std::path::Path;

use apartment_eda_table::Frame;
use serde::{Deserialize, Serialize};

use crate::counts::{self, CityCount, CityTypeCount};
use crate::geo::{self, CityLocation, CityMap};
use crate::overview::{self, Overview};
use crate::poi::{self, PoiLayer};
use crate::price::{self, PriceStats};
use crate::scatter::Scatter;
use crate::{SummaryError, cities};

/// Every dataset-wide statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReport {
    pub overview: Overview,
    pub offers_per_city: Vec<CityCount>,
    pub offers_per_city_and_type: Vec<CityTypeCount>,
    /// `None` when no offer has a usable price per square metre.
    pub price_per_m2: Option<PriceStats>,
    pub city_locations: Vec<CityLocation>,
}

/// One city's offers and nearby points of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityReport {
    pub map: CityMap,
    pub poi_layers: Vec<PoiLayer>,
}

/// Computes the dataset-wide report.
///
/// # Errors
///
/// Returns the first [`SummaryError`] raised by a statistic.
pub fn dataset_report(frame: &Frame) -> Result<DatasetReport, SummaryError> {
    Ok(DatasetReport {
        overview: overview::overview(frame)?,
        offers_per_city: counts::offers_per_city(frame)?,
        offers_per_city_and_type: counts::offers_per_city_and_type(frame)?,
        price_per_m2: price::price_per_m2_stats(frame)?,
        city_locations: geo::city_locations(frame)?,
    })
}

/// Computes the report for `city`, or for [`geo::default_city`] when
/// `None`. POI layers are read from `data_dir`.
///
/// # Errors
///
/// Returns [`SummaryError::NoCities`] if no city can be selected, and any
/// error from [`geo::city_map`].
pub fn city_report(
    frame: &Frame,
    city: Option<&str>,
    data_dir: &Path,
) -> Result<CityReport, SummaryError> {
    let cities = cities(frame)?;
    let city = match city {
        Some(city) => city,
        None => geo::default_city(&cities).ok_or(SummaryError::NoCities)?,
    };
    log::info!("Building map for {city}");

    let map = geo::city_map(frame, city)?;
    let poi_layers = poi::load_layers(data_dir, city);
    Ok(CityReport { map, poi_layers })
}

fn value(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

/// Renders the dataset report as plain text.
#[must_use]
pub fn render_dataset(report: &DatasetReport) -> String {
    let mut out = String::new();
    let o = &report.overview;

    let _ = writeln!(out, "Records: {}", o.records);
    let _ = writeln!(out, "Cities: {}", o.cities.join(", "));
    let _ = writeln!(
        out,
        "Area: {} m² to {} m² (most common {} m²)",
        value(o.area_min),
        value(o.area_max),
        value(o.area_mode)
    );

    let _ = writeln!(out, "\nOffers per city:");
    for c in &report.offers_per_city {
        let _ = writeln!(out, "  {:<24} {:>8}", c.city, c.count);
    }

    let _ = writeln!(out, "\nOffers per city and property type:");
    for c in &report.offers_per_city_and_type {
        let _ = writeln!(out, "  {:<24} {:<20} {:>8}", c.city, c.property_type, c.count);
    }

    let _ = writeln!(out, "\nPrice per m²:");
    match &report.price_per_m2 {
        Some(p) => {
            let _ = writeln!(out, "  mean    {:>12.2} PLN/m²", p.mean);
            let _ = writeln!(out, "  median  {:>12.2} PLN/m²", p.median);
            let _ = writeln!(out, "  max     {:>12.2} PLN/m²", p.max);
            let _ = writeln!(out, "  min     {:>12.2} PLN/m²", p.min);
            let _ = writeln!(out, "  std     {:>12} PLN/m²", value(p.std));
            let _ = writeln!(out, "  offers  {:>12}", p.count);
        }
        None => {
            let _ = writeln!(out, "  no data");
        }
    }

    let _ = writeln!(out, "\nCity locations:");
    for l in &report.city_locations {
        let _ = writeln!(
            out,
            "  {:<24} {:>10} {:>10} {:>8}",
            l.city,
            value(l.latitude.map(|v| (v * 1e4).round() / 1e4)),
            value(l.longitude.map(|v| (v * 1e4).round() / 1e4)),
            l.count
        );
    }

    out
}

/// Renders a city report as plain text.
#[must_use]
pub fn render_city(report: &CityReport) -> String {
    let mut out = String::new();
    let map = &report.map;

    let _ = writeln!(
        out,
        "{}: {} offers around ({:.4}, {:.4})",
        map.city,
        map.offers.len(),
        map.center_latitude,
        map.center_longitude
    );
    for offer in &map.offers {
        let _ = writeln!(
            out,
            "  ({:.5}, {:.5})  {:>12}  intensity {}",
            offer.latitude,
            offer.longitude,
            offer.price.map_or_else(|| "n/a".to_string(), |p| format!("{p:.0} PLN")),
            offer
                .intensity
                .map_or_else(|| "n/a".to_string(), |i| format!("{i:.2}"))
        );
    }

    let _ = writeln!(out, "\nPoints of interest:");
    if report.poi_layers.is_empty() {
        let _ = writeln!(out, "  none loaded");
    }
    for layer in &report.poi_layers {
        let _ = writeln!(out, "  {:<24} {:>6}", layer.label, layer.points.len());
    }

    out
}

/// Renders scatter points as two columns of values under the axis names.
#[must_use]
pub fn render_scatter(scatter: &Scatter) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} vs {}: {} points",
        scatter.x,
        scatter.y,
        scatter.points.len()
    );
    let _ = writeln!(out, "  {:>16} {:>16}", scatter.x, scatter.y);
    for point in &scatter.points {
        let _ = writeln!(out, "  {:>16} {:>16}", point.x, point.y);
    }
    out
}
