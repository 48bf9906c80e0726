//! Ordered cleaning steps, from raw CSV to cleaned CSV.
//!
//! Steps run strictly in [`PipelineStep::ALL`] order. The cleaned file is
//! only written after every transforming step has succeeded, and it is
//! replaced atomically, so a failed run leaves any previous output intact.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use apartment_eda_listing_models::{CleanConfig, CleanReport, Diagnostics, PipelineStep};
use apartment_eda_table::{Frame, TableError, read::read_csv, write::write_csv_atomic};

use crate::diagnostics::{self, DiagnosticsError};
use crate::progress::ProgressCallback;
use crate::{CleanError, booleans, city, derive, impute, paths, rename};

/// Runs the full pipeline described by `config`.
///
/// Progress advances by one unit per completed step.
///
/// # Errors
///
/// Returns the [`CleanError`] of the first failing step. Nothing is written
/// in that case.
pub fn run(
    config: &CleanConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<CleanReport, CleanError> {
    let start = Instant::now();
    progress.set_total(PipelineStep::ALL.len() as u64);

    let step = |s: PipelineStep| {
        log::info!("Step: {s}");
        progress.set_message(s.to_string());
    };

    step(PipelineStep::Load);
    let mut frame = load(&config.input)?;
    log::info!(
        "Loaded {} rows from {}",
        frame
            .rows()
            .map_err(|e| CleanError::table(PipelineStep::Load, e))?,
        config.input.display()
    );
    progress.inc(1);

    step(PipelineStep::Diagnostics);
    let diagnostics = match diagnostics::diagnose(&frame) {
        Ok(report) => {
            diagnostics::log_report(&report);
            Some(report)
        }
        Err(e) => {
            log::warn!("Diagnostics unavailable: {e}");
            None
        }
    };
    progress.inc(1);

    step(PipelineStep::Booleans);
    booleans::normalize_booleans(&mut frame)?;
    progress.inc(1);

    step(PipelineStep::Cities);
    city::canonicalize_cities(&mut frame)?;
    progress.inc(1);

    step(PipelineStep::NumericImputation);
    let unimputed_columns = impute::impute_medians(&mut frame)?;
    progress.inc(1);

    step(PipelineStep::CategoricalImputation);
    impute::fill_unknown_categories(&mut frame)?;
    progress.inc(1);

    step(PipelineStep::DerivedColumns);
    derive::add_price_log(&mut frame)?;
    if config.price_per_m2 {
        derive::add_price_per_m2(&mut frame)?;
    }
    progress.inc(1);

    step(PipelineStep::Rename);
    rename::rename_columns(&mut frame, config.unmapped)?;
    progress.inc(1);

    step(PipelineStep::Persist);
    persist(&frame, &config.output)?;
    let rows = frame.rows().map_err(|e| CleanError::table(PipelineStep::Persist, e))?;
    let columns = frame
        .column_names()
        .map_err(|e| CleanError::table(PipelineStep::Persist, e))?;
    progress.inc(1);

    let duration = start.elapsed();
    log::info!(
        "Wrote {rows} rows x {} columns to {} in {:.2}s",
        columns.len(),
        config.output.display(),
        duration.as_secs_f64()
    );
    progress.finish(format!("Cleaned {rows} rows"));

    Ok(CleanReport {
        input: config.input.clone(),
        output: config.output.clone(),
        rows,
        columns,
        unimputed_columns,
        diagnostics,
        duration,
    })
}

/// Loads a raw file and reports its diagnostics without cleaning it.
///
/// # Errors
///
/// Returns [`CleanError::DataLoad`] if the file cannot be loaded. Empty
/// tables load fine but yield `Ok(None)`.
pub fn diagnose_file(path: &Path) -> Result<Option<Diagnostics>, CleanError> {
    let frame = load(path)?;
    match diagnostics::diagnose(&frame) {
        Ok(report) => Ok(Some(report)),
        Err(DiagnosticsError::EmptyTable) => Ok(None),
        Err(DiagnosticsError::Table(e)) => Err(CleanError::table(PipelineStep::Diagnostics, e)),
    }
}

fn load(path: &Path) -> Result<Frame, CleanError> {
    read_csv(path).map_err(|source| CleanError::DataLoad {
        path: path.to_path_buf(),
        source,
    })
}

fn persist(frame: &Frame, path: &Path) -> Result<(), CleanError> {
    let persist_error = |source| CleanError::Persist {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        paths::ensure_dir(parent).map_err(|e| persist_error(TableError::Io(e)))?;
    }

    write_csv_atomic(frame, path).map_err(persist_error)
}
