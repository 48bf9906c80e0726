//! Interactive cleaning flow.

use std::path::PathBuf;

use apartment_eda_clean::{diagnostics, paths, pipeline};
use apartment_eda_cli_utils::{IndicatifProgress, MultiProgress, choose};
use apartment_eda_listing_models::{CleanConfig, UnmappedColumns};
use dialoguer::{Confirm, Input};

const UNMAPPED: &[UnmappedColumns] = &[UnmappedColumns::Keep, UnmappedColumns::Drop];

const fn unmapped_label(policy: &UnmappedColumns) -> &'static str {
    match policy {
        UnmappedColumns::Keep => "Keep under their original names",
        UnmappedColumns::Drop => "Drop them",
    }
}

fn prompt_path(prompt: &str, default: PathBuf) -> dialoguer::Result<PathBuf> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .default(default.display().to_string())
        .interact_text()?;
    Ok(PathBuf::from(value))
}

/// Prompts for paths and options, then runs the pipeline with a step bar.
///
/// # Errors
///
/// Returns an error if a prompt fails or the pipeline aborts.
pub fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let input = prompt_path("Raw CSV", paths::raw_data_path())?;
    let output = prompt_path("Cleaned CSV", paths::cleaned_data_path())?;

    let mut config = CleanConfig::new(input, output);
    config.price_per_m2 = Confirm::new()
        .with_prompt("Derive price per m²?")
        .default(true)
        .interact()?;
    config.unmapped = *choose(
        "Columns without a Polish name",
        UNMAPPED,
        unmapped_label,
        0,
    )?;

    let progress = IndicatifProgress::steps_bar(multi, "Cleaning");
    let report = pipeline::run(&config, &progress)?;

    println!();
    println!(
        "Wrote {} rows x {} columns to {} in {:.2}s",
        report.rows,
        report.columns.len(),
        report.output.display(),
        report.duration.as_secs_f64()
    );
    if !report.unimputed_columns.is_empty() {
        println!(
            "No values to impute from in: {}",
            report.unimputed_columns.join(", ")
        );
    }

    Ok(())
}

/// Prompts for the raw file and prints its diagnostics.
///
/// # Errors
///
/// Returns an error if a prompt fails or the file cannot be loaded.
pub fn diagnose() -> Result<(), Box<dyn std::error::Error>> {
    let input = prompt_path("Raw CSV", paths::raw_data_path())?;
    match pipeline::diagnose_file(&input)? {
        Some(report) => print!("{}", diagnostics::render(&report)),
        None => println!("{} has no rows", input.display()),
    }
    Ok(())
}
