#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for exploring the cleaned listings.

use std::path::PathBuf;

use apartment_eda_clean::paths::{cleaned_data_path, data_dir};
use apartment_eda_summary::{load, report, scatter};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "apartment_eda_summary",
    about = "Explore the cleaned apartment listings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dataset-wide statistics
    Overview {
        /// Cleaned listings CSV (overrides `APARTMENT_EDA_CLEANED_PATH`)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Offers and points of interest for one city
    City {
        /// City name as it appears in the cleaned file (default: Warszawa)
        name: Option<String>,
        /// Cleaned listings CSV (overrides `APARTMENT_EDA_CLEANED_PATH`)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Directory holding the `poi_*.csv` files (overrides `APARTMENT_EDA_DATA_DIR`)
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pairs of numeric values for a scatter plot
    Scatter {
        /// Column on the x axis (default: powierzchnia_m2, else the first numeric column)
        #[arg(long)]
        x: Option<String>,
        /// Column on the y axis (default: cena, else the second numeric column)
        #[arg(long)]
        y: Option<String>,
        /// Cleaned listings CSV (overrides `APARTMENT_EDA_CLEANED_PATH`)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Print the points as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Overview { input, json } => {
            let frame = load(&input.unwrap_or_else(cleaned_data_path))?;
            let report = report::dataset_report(&frame)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report::render_dataset(&report));
            }
        }
        Commands::City {
            name,
            input,
            data_dir: dir,
            json,
        } => {
            let frame = load(&input.unwrap_or_else(cleaned_data_path))?;
            let report =
                report::city_report(&frame, name.as_deref(), &dir.unwrap_or_else(data_dir))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report::render_city(&report));
            }
        }
        Commands::Scatter { x, y, input, json } => {
            let frame = load(&input.unwrap_or_else(cleaned_data_path))?;
            match scatter::scatter(&frame, x.as_deref(), y.as_deref())? {
                Some(plot) if json => println!("{}", serde_json::to_string_pretty(&plot)?),
                Some(plot) => print!("{}", report::render_scatter(&plot)),
                None => println!("Fewer than two numeric columns; nothing to plot"),
            }
        }
    }

    Ok(())
}
