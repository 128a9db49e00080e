//! Shared driver for the batch commands

use anyhow::{bail, Result};
use tracing::info;

use adn_pipeline::{BatchConfig, BatchStatus, OutputLayout, RecordSource};

use crate::cli::BatchArgs;
use crate::context::AppContext;
use crate::{output, progress};

/// Worker count from `-j`, falling back to the configuration; 0 means one
/// per CPU.
pub fn resolve_workers(jobs: Option<usize>, configured: usize) -> usize {
    match jobs.unwrap_or(configured) {
        0 => num_cpus::get().max(1),
        n => n,
    }
}

/// Batch policy from the command line and configuration
pub fn batch_config(
    ctx: &AppContext,
    layout: OutputLayout,
    args: &BatchArgs,
    default_template: &str,
) -> BatchConfig {
    let template = args
        .template
        .clone()
        .unwrap_or_else(|| default_template.to_string());

    BatchConfig::new(layout, template)
        .with_skip_existing(ctx.config.skip_existing && !args.no_skip_existing)
        .with_force(args.force)
        .with_workers(resolve_workers(args.jobs, ctx.config.workers))
        .with_date_format(ctx.config.date_format.clone())
}

/// Run a batch with a progress bar and print the summary.
///
/// Fails when the batch cannot start or when every record failed.
pub async fn run(ctx: &AppContext, source: &dyn RecordSource, config: BatchConfig) -> Result<()> {
    let pipeline = ctx.pipeline()?;
    let bar = progress::batch_bar(source.count().ok())?;

    output::info(&format!(
        "Processing {} with template '{}'",
        source.describe(),
        config.template
    ));

    let result = pipeline
        .run_with(source, &config, |record| progress::record_done(&bar, record))
        .await;
    bar.finish_and_clear();
    let report = result?;

    output::print_report(&report);
    info!(
        "{}: {} created, {} skipped, {} failed",
        source.describe(),
        report.created(),
        report.skipped(),
        report.failed()
    );

    match report.status() {
        BatchStatus::Empty => {
            output::warning("No records to process");
            Ok(())
        }
        BatchStatus::Failure => bail!("All {} records failed", report.total()),
        BatchStatus::Success | BatchStatus::PartialSuccess => Ok(()),
    }
}
