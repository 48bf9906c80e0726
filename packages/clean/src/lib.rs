#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cleaning pipeline for the raw apartment listings dataset.
//!
//! Turns the raw CSV into the cleaned CSV the dashboard reads: yes/no flags
//! become nullable integers, city names are canonicalized, gaps are imputed,
//! price columns are derived, and every column is renamed to the Polish
//! vocabulary. See [`pipeline::run`] for the ordered steps.

pub mod booleans;
pub mod city;
pub mod derive;
pub mod diagnostics;
pub mod impute;
pub mod paths;
pub mod pipeline;
pub mod progress;
pub mod rename;
pub mod tables;

use std::path::PathBuf;

use apartment_eda_listing_models::PipelineStep;
use apartment_eda_table::TableError;

pub use pipeline::run;

/// Fatal errors that abort a cleaning run. Each message names the step
/// that failed.
#[derive(Debug, thiserror::Error)]
pub enum CleanError {
    /// The raw file is missing, unreadable, or not a valid table.
    #[error("[load] cannot load raw data from {}: {source}", path.display())]
    DataLoad {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    /// A column the step operates on is absent from the table.
    #[error("[{step}] required column '{column}' is missing")]
    MissingColumn { step: PipelineStep, column: String },

    /// A median-imputed column holds non-numeric values.
    #[error("[numeric imputation] column '{column}' is not numeric")]
    NonNumericColumn { column: String },

    /// A derived column could not be computed.
    #[error("[derived columns] cannot compute '{column}': {message}")]
    DerivedColumn { column: String, message: String },

    /// Two output columns would end up with the same name.
    #[error("[rename] output column '{name}' would appear more than once")]
    RenameCollision { name: String },

    /// The cleaned file could not be written.
    #[error("[persist] cannot write cleaned data to {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    /// A table invariant was violated inside a step.
    #[error("[{step}] {source}")]
    Table {
        step: PipelineStep,
        #[source]
        source: TableError,
    },
}

impl CleanError {
    /// Wraps a table error raised inside `step`.
    #[must_use]
    pub const fn table(step: PipelineStep, source: TableError) -> Self {
        Self::Table { step, source }
    }

    /// The step this error aborted.
    #[must_use]
    pub const fn step(&self) -> PipelineStep {
        match self {
            Self::DataLoad { .. } => PipelineStep::Load,
            Self::MissingColumn { step, .. } | Self::Table { step, .. } => *step,
            Self::NonNumericColumn { .. } => PipelineStep::NumericImputation,
            Self::DerivedColumn { .. } => PipelineStep::DerivedColumns,
            Self::RenameCollision { .. } => PipelineStep::Rename,
            Self::Persist { .. } => PipelineStep::Persist,
        }
    }
}
