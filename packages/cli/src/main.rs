#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive entry point for the apartment listings tools.
//!
//! Lets users pick between cleaning the raw dataset and exploring the
//! cleaned one, prompting for paths and options along the way. Log output
//! is routed through [`apartment_eda_cli_utils::init_logger`] so it does not
//! interleave with the step progress bar.

mod clean;
mod explore;

use apartment_eda_cli_utils::choose;

/// Top-level actions.
enum Tool {
    Clean,
    Diagnose,
    Overview,
    City,
    Scatter,
}

impl Tool {
    const ALL: &[Self] = &[
        Self::Clean,
        Self::Diagnose,
        Self::Overview,
        Self::City,
        Self::Scatter,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Clean => "Clean raw dataset",
            Self::Diagnose => "Show raw data diagnostics",
            Self::Overview => "Show dataset overview",
            Self::City => "Explore a city",
            Self::Scatter => "Plot two numeric columns",
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = apartment_eda_cli_utils::init_logger();

    println!("Apartment listings EDA");
    println!();

    match choose("What would you like to do?", Tool::ALL, Tool::label, 0)? {
        Tool::Clean => clean::run(&multi)?,
        Tool::Diagnose => clean::diagnose()?,
        Tool::Overview => explore::overview()?,
        Tool::City => explore::city()?,
        Tool::Scatter => explore::scatter()?,
    }

    Ok(())
}
