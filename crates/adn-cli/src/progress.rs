//! Batch progress bar

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use adn_pipeline::RecordReport;

use crate::output;

/// Progress bar for a batch of `total` records, hidden with `--quiet`.
pub fn batch_bar(total: Option<usize>) -> Result<ProgressBar> {
    if output::is_quiet() {
        return Ok(ProgressBar::hidden());
    }

    let bar = match total {
        Some(total) => {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                    )?
                    .progress_chars("#>-"),
            );
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {pos} {msg}")?);
            bar
        }
    };
    Ok(bar)
}

/// Advance the bar for one finished record.
pub fn record_done(bar: &ProgressBar, report: &RecordReport) {
    bar.set_message(report.label.clone());
    bar.inc(1);
}
