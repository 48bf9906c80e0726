//! Interactive exploration of the cleaned dataset.

use std::path::PathBuf;

use apartment_eda_clean::paths;
use apartment_eda_cli_utils::choose;
use apartment_eda_summary::{cities, geo, load, report, scatter};
use dialoguer::Input;

fn cleaned_path() -> dialoguer::Result<PathBuf> {
    let value: String = Input::new()
        .with_prompt("Cleaned CSV")
        .default(paths::cleaned_data_path().display().to_string())
        .interact_text()?;
    Ok(PathBuf::from(value))
}

/// Prints the dataset-wide report.
///
/// # Errors
///
/// Returns an error if a prompt fails or the report cannot be computed.
pub fn overview() -> Result<(), Box<dyn std::error::Error>> {
    let frame = load(&cleaned_path()?)?;
    print!("{}", report::render_dataset(&report::dataset_report(&frame)?));
    Ok(())
}

/// Lets the user pick a city and prints its offers and POI layers.
///
/// # Errors
///
/// Returns an error if a prompt fails or the city's offers cannot be
/// mapped.
pub fn city() -> Result<(), Box<dyn std::error::Error>> {
    let frame = load(&cleaned_path()?)?;
    let names = cities(&frame)?;
    if names.is_empty() {
        println!("No cities in the dataset.");
        return Ok(());
    }
    let default = geo::default_city(&names)
        .and_then(|d| names.iter().position(|c| c == d))
        .unwrap_or(0);

    let city = choose("City", &names, String::clone, default)?;
    let report = report::city_report(&frame, Some(city.as_str()), &paths::data_dir())?;
    print!("{}", report::render_city(&report));
    Ok(())
}

/// Lets the user pick two numeric columns and prints their points.
///
/// # Errors
///
/// Returns an error if a prompt fails or a column cannot be read.
pub fn scatter() -> Result<(), Box<dyn std::error::Error>> {
    let frame = load(&cleaned_path()?)?;
    let columns = scatter::numeric_columns(&frame)?;
    let Some((default_x, default_y)) = scatter::default_axes(&columns) else {
        println!("Fewer than two numeric columns; nothing to plot.");
        return Ok(());
    };
    let position = |name: &str| columns.iter().position(|c| c == name).unwrap_or(0);

    let x = choose("X axis", &columns, String::clone, position(default_x))?;
    let y = choose("Y axis", &columns, String::clone, position(default_y))?;
    if let Some(plot) = scatter::scatter(&frame, Some(x.as_str()), Some(y.as_str()))? {
        print!("{}", report::render_scatter(&plot));
    }
    Ok(())
}
