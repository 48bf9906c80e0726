#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal helpers shared by the interactive tools.
//!
//! [`IndicatifProgress`] draws the cleaning pipeline's progress with `indicatif`,
//! [`init_logger`] routes `log` output through the same `MultiProgress` so
//! log lines never tear a bar, and [`choose`] wraps a `dialoguer` menu.

use std::sync::Arc;

use apartment_eda_clean::progress::ProgressCallback;
use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// An `indicatif` [`ProgressBar`] that implements [`ProgressCallback`].
pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    /// Creates a bar counting pipeline steps. The total arrives through
    /// [`ProgressCallback::set_total`]; the message tracks the running step.
    #[must_use]
    pub fn steps_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new(0));
        bar.set_style(
            ProgressStyle::with_template(
                "{prefix:.bold} {wide_bar:.green/dim} {pos}/{len} {msg} [{elapsed_precise}]",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
        );
        bar.set_prefix(message.to_string());
        Arc::new(Self { bar })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Shows a menu of `items` and returns the chosen one.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read.
pub fn choose<'a, T, S: AsRef<str>>(
    prompt: &str,
    items: &'a [T],
    label: impl Fn(&T) -> S,
    default: usize,
) -> dialoguer::Result<&'a T> {
    let labels: Vec<String> = items
        .iter()
        .map(|item| label(item).as_ref().to_string())
        .collect();
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(default.min(items.len().saturating_sub(1)))
        .interact()?;
    Ok(&items[idx])
}

/// Initializes `pretty_env_logger` behind `indicatif-log-bridge`.
///
/// Every progress bar must be added to the returned [`MultiProgress`].
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // Already installed when called twice.
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_bar_tracks_steps_and_message() {
        let bar = ProgressBar::hidden();
        let progress = IndicatifProgress { bar: bar.clone() };

        progress.set_total(9);
        progress.inc(1);
        progress.inc(2);
        progress.set_message("rename".to_string());

        assert_eq!(bar.length(), Some(9));
        assert_eq!(bar.position(), 3);
        assert_eq!(bar.message(), "rename");

        progress.finish("done".to_string());
        assert!(bar.is_finished());
    }
}
