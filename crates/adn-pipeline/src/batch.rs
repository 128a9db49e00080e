//! Batch conversion orchestrator
//!
//! ## Per-record flow
//!
//! 1. **Name**: compute the output path from the [`OutputLayout`]. Paths are
//!    claimed in source order; a later record that names the same note fails
//! 2. **Skip check**: an existing note is kept when `skip_existing` is set and
//!    `force` is not
//! 3. **Derive**: create the [`Document`] with its initial review state
//! 4. **Render**: fill the template with record fields and review state
//! 5. **Write**: hand the note to the [`OutputWriter`]
//!
//! Any failure in steps 1, 4 or 5 (or an unreadable record) is recorded and
//! the batch moves on. Records run on a bounded pool of `workers`; the report
//! always lists them in source order.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use adn_core::Document;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::error::{PipelineError, PipelineResult, RecordError, RenderError};
use crate::naming::OutputLayout;
use crate::record::{RawRecord, RecordSource, SourceItem};
use crate::report::{ProcessingReport, RecordOutcome, RecordReport};
use crate::template::{TemplateContext, TemplateRenderer};
use crate::writer::OutputWriter;

/// Execution policy for a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub layout: OutputLayout,
    /// Template name
    pub template: String,
    /// Keep notes that already exist
    pub skip_existing: bool,
    /// Overwrite existing notes regardless of `skip_existing`
    pub force: bool,
    /// Records processed concurrently
    pub workers: usize,
    /// strftime format for the `date` template variable
    pub date_format: String,
}

impl BatchConfig {
    pub fn new(layout: OutputLayout, template: impl Into<String>) -> Self {
        Self {
            layout,
            template: template.into(),
            skip_existing: true,
            force: false,
            workers: 1,
            date_format: "%d/%m/%Y %H:%M".to_string(),
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_skip_existing(mut self, skip_existing: bool) -> Self {
        self.skip_existing = skip_existing;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    fn validate(&self) -> PipelineResult<()> {
        if self.workers == 0 {
            return Err(PipelineError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if let OutputLayout::Numbered { start_number: 0, .. } = self.layout {
            return Err(PipelineError::InvalidConfig(
                "start number must be at least 1".to_string(),
            ));
        }
        // chrono panics when displaying an invalid format
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(PipelineError::InvalidConfig(format!(
                "invalid date format '{}'",
                self.date_format
            )));
        }
        Ok(())
    }
}

/// A record after naming, before any IO
enum Planned {
    Ready { record: RawRecord, path: PathBuf },
    Done(RecordReport),
}

/// Applies the review engine and a template to every record of a source
pub struct BatchPipeline {
    renderer: Arc<dyn TemplateRenderer>,
    writer: Arc<dyn OutputWriter>,
}

impl BatchPipeline {
    pub fn new(renderer: Arc<dyn TemplateRenderer>, writer: Arc<dyn OutputWriter>) -> Self {
        Self { renderer, writer }
    }

    /// Run a batch.
    ///
    /// Returns `Err` only for batch-fatal problems: invalid configuration, a
    /// missing template or a source that fails validation. Everything else is
    /// reported per record.
    pub async fn run(
        &self,
        source: &dyn RecordSource,
        config: &BatchConfig,
    ) -> PipelineResult<ProcessingReport> {
        self.run_with(source, config, |_| {}).await
    }

    /// Run a batch, calling `on_record` as each record completes (in source
    /// order).
    pub async fn run_with<F>(
        &self,
        source: &dyn RecordSource,
        config: &BatchConfig,
        mut on_record: F,
    ) -> PipelineResult<ProcessingReport>
    where
        F: FnMut(&RecordReport),
    {
        let start = Instant::now();

        config.validate()?;
        if !self.renderer.has_template(&config.template) {
            return Err(RenderError::TemplateNotFound(config.template.clone()).into());
        }
        source.validate()?;
        let records = source.records()?;

        info!(
            "Processing {} with template '{}' ({} workers)",
            source.describe(),
            config.template,
            config.workers
        );

        let generated_at = Local::now();
        let mut claimed = HashMap::new();
        let records: Vec<RecordReport> = stream::iter(records)
            .map(|item| plan(item, &config.layout, &mut claimed))
            .map(|planned| self.process(planned, config, &generated_at))
            .buffered(config.workers)
            .inspect(|report| on_record(report))
            .collect()
            .await;

        let report = ProcessingReport {
            records,
            elapsed: start.elapsed(),
        };

        info!(
            "Batch finished ({}): {} created, {} skipped, {} failed in {:?}",
            report.status(),
            report.created(),
            report.skipped(),
            report.failed(),
            report.elapsed
        );
        Ok(report)
    }

    async fn process(
        &self,
        planned: Planned,
        config: &BatchConfig,
        generated_at: &DateTime<Local>,
    ) -> RecordReport {
        let (record, path) = match planned {
            Planned::Ready { record, path } => (record, path),
            Planned::Done(report) => return report,
        };

        let exists = self.writer.exists(&path).await;
        if exists && config.skip_existing && !config.force {
            debug!("Skipping {}: {} already exists", record.label, path.display());
            return RecordReport {
                ordinal: record.ordinal,
                label: record.label,
                output: Some(path),
                outcome: RecordOutcome::Skipped,
            };
        }

        let document =
            Document::new(record.id.clone(), record.metadata()).with_output_path(path.clone());
        let context =
            TemplateContext::for_record(&record, &document, generated_at, &config.date_format);

        let outcome = match self.renderer.render(&config.template, &context) {
            Err(err) => RecordOutcome::Failed(RecordError::Render(err)),
            Ok(contents) => match self.writer.write(&path, &contents).await {
                Ok(()) => {
                    debug!(
                        "{} {} for {}",
                        if exists { "Overwrote" } else { "Created" },
                        path.display(),
                        record.label
                    );
                    RecordOutcome::created(document, exists)
                }
                Err(source) => RecordOutcome::Failed(RecordError::Write {
                    path: path.clone(),
                    source,
                }),
            },
        };

        if let Some(err) = outcome.error() {
            warn!("Failed to process {}: {}", record.label, err);
        }

        RecordReport {
            ordinal: record.ordinal,
            label: record.label,
            output: Some(path),
            outcome,
        }
    }
}

/// Name the output of one record and claim it for that record.
fn plan(
    item: SourceItem,
    layout: &OutputLayout,
    claimed: &mut HashMap<PathBuf, String>,
) -> Planned {
    let record = match item {
        Ok(record) => record,
        Err(failure) => {
            warn!("Skipping unreadable record {}: {}", failure.label, failure.reason);
            return Planned::Done(RecordReport {
                ordinal: failure.ordinal,
                label: failure.label,
                output: None,
                outcome: RecordOutcome::Failed(RecordError::Source(failure.reason)),
            });
        }
    };

    let path = match layout.path_for(&record) {
        Ok(path) => path,
        Err(err) => {
            warn!("Failed to name output for {}: {}", record.label, err);
            return Planned::Done(RecordReport {
                ordinal: record.ordinal,
                label: record.label,
                output: None,
                outcome: RecordOutcome::Failed(err),
            });
        }
    };

    if let Some(owner) = claimed.get(&path) {
        let err = RecordError::DuplicateOutput {
            path: path.clone(),
            owner: owner.clone(),
        };
        warn!("Failed to process {}: {}", record.label, err);
        return Planned::Done(RecordReport {
            ordinal: record.ordinal,
            label: record.label,
            output: Some(path),
            outcome: RecordOutcome::Failed(err),
        });
    }
    claimed.insert(path.clone(), record.label.clone());

    Planned::Ready { record, path }
}
