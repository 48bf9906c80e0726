#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the listings cleaning pipeline.

use std::path::PathBuf;

use apartment_eda_clean::{diagnostics, paths, pipeline, progress::null_progress, tables};
use apartment_eda_listing_models::{CleanConfig, UnmappedColumns};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "apartment_eda_clean",
    about = "Clean the raw apartment listings dataset"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full cleaning pipeline and write the cleaned CSV
    Clean {
        /// Raw listings CSV (overrides `APARTMENT_EDA_RAW_PATH`)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Cleaned CSV destination (overrides `APARTMENT_EDA_CLEANED_PATH`)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Do not derive the price-per-square-metre column
        #[arg(long)]
        skip_price_per_m2: bool,
        /// What to do with columns that have no Polish name: `keep` or `drop`
        #[arg(long, default_value = "keep")]
        unmapped: UnmappedColumns,
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load the raw CSV and print data-quality diagnostics only
    Diagnose {
        /// Raw listings CSV (overrides `APARTMENT_EDA_RAW_PATH`)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the city correction and column rename tables
    Tables,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Clean {
        input: None,
        output: None,
        skip_price_per_m2: false,
        unmapped: UnmappedColumns::default(),
        json: false,
    });

    match command {
        Commands::Clean {
            input,
            output,
            skip_price_per_m2,
            unmapped,
            json,
        } => {
            let mut config = CleanConfig::new(
                input.unwrap_or_else(paths::raw_data_path),
                output.unwrap_or_else(paths::cleaned_data_path),
            );
            config.price_per_m2 = !skip_price_per_m2;
            config.unmapped = unmapped;

            let report = pipeline::run(&config, &null_progress())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Cleaned {} rows into {} ({} columns)",
                    report.rows,
                    report.output.display(),
                    report.columns.len()
                );
                for column in &report.unimputed_columns {
                    println!("  warning: '{column}' had no values to impute from");
                }
            }
        }
        Commands::Diagnose { input, json } => {
            let input = input.unwrap_or_else(paths::raw_data_path);
            match pipeline::diagnose_file(&input)? {
                Some(report) if json => println!("{}", serde_json::to_string_pretty(&report)?),
                Some(report) => print!("{}", diagnostics::render(&report)),
                None => println!("{} has no rows", input.display()),
            }
        }
        Commands::Tables => {
            println!("{:<24} CANONICAL", "CITY");
            println!("{}", "-".repeat(50));
            for (from, to) in tables::city_corrections() {
                println!("{from:<24} {to}");
            }
            println!();
            println!("{:<24} RENAMED", "COLUMN");
            println!("{}", "-".repeat(50));
            for (from, to) in tables::column_translations() {
                println!("{from:<24} {to}");
            }
        }
    }

    Ok(())
}
