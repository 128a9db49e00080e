//! Batch results

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use adn_core::Document;

use crate::error::RecordError;

/// What happened to a single record
#[derive(Debug)]
pub enum RecordOutcome {
    /// A note was written
    Created {
        /// The generated document with its initial review state
        document: Box<Document>,
        /// Whether an existing note was replaced
        overwritten: bool,
    },
    /// The note already existed and was left alone
    Skipped,
    /// The record failed; the batch carried on
    Failed(RecordError),
}

impl RecordOutcome {
    pub fn created(document: Document, overwritten: bool) -> Self {
        Self::Created {
            document: Box::new(document),
            overwritten,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, RecordOutcome::Created { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, RecordOutcome::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RecordOutcome::Failed(_))
    }

    pub fn error(&self) -> Option<&RecordError> {
        match self {
            RecordOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Per-record entry of a [`ProcessingReport`]
#[derive(Debug)]
pub struct RecordReport {
    pub ordinal: usize,
    pub label: String,
    /// Target note path, when one could be computed
    pub output: Option<PathBuf>,
    pub outcome: RecordOutcome,
}

impl RecordReport {
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

/// Overall result of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// The source had no records
    Empty,
    /// No record failed
    Success,
    /// Some records failed
    PartialSuccess,
    /// Every record failed
    Failure,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BatchStatus::Empty => "empty",
            BatchStatus::Success => "success",
            BatchStatus::PartialSuccess => "partial success",
            BatchStatus::Failure => "failure",
        };
        f.write_str(s)
    }
}

/// Records in source order plus batch totals
#[derive(Debug, Default)]
pub struct ProcessingReport {
    pub records: Vec<RecordReport>,
    pub elapsed: Duration,
}

impl ProcessingReport {
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn created(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_created()).count()
    }

    pub fn skipped(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_skipped()).count()
    }

    pub fn failed(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_failed()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&RecordReport, &RecordError)> {
        self.records
            .iter()
            .filter_map(|r| r.outcome.error().map(|e| (r, e)))
    }

    pub fn created_paths(&self) -> impl Iterator<Item = &Path> {
        self.records
            .iter()
            .filter(|r| r.outcome.is_created())
            .filter_map(RecordReport::output)
    }

    pub fn status(&self) -> BatchStatus {
        let failed = self.failed();
        match (self.total(), failed) {
            (0, _) => BatchStatus::Empty,
            (_, 0) => BatchStatus::Success,
            (total, failed) if failed == total => BatchStatus::Failure,
            _ => BatchStatus::PartialSuccess,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adn_core::{DocumentId, DocumentMetadata};

    fn entry(ordinal: usize, outcome: RecordOutcome) -> RecordReport {
        RecordReport {
            ordinal,
            label: format!("row {}", ordinal + 1),
            output: Some(PathBuf::from(format!("{:03}.md", ordinal + 1))),
            outcome,
        }
    }

    fn created() -> RecordOutcome {
        RecordOutcome::created(
            Document::new(DocumentId::Row(0), DocumentMetadata::default()),
            false,
        )
    }

    fn failed() -> RecordOutcome {
        RecordOutcome::Failed(RecordError::Source("bad".into()))
    }

    #[test]
    fn status_from_counts() {
        assert_eq!(ProcessingReport::default().status(), BatchStatus::Empty);

        let report = ProcessingReport {
            records: vec![entry(0, created()), entry(1, RecordOutcome::Skipped)],
            ..Default::default()
        };
        assert_eq!(report.status(), BatchStatus::Success);
        assert_eq!(report.created_paths().count(), 1);

        let report = ProcessingReport {
            records: vec![entry(0, created()), entry(1, failed())],
            ..Default::default()
        };
        assert_eq!(report.status(), BatchStatus::PartialSuccess);
        assert_eq!(report.failures().count(), 1);

        let report = ProcessingReport {
            records: vec![entry(0, failed()), entry(1, failed())],
            ..Default::default()
        };
        assert_eq!(report.status(), BatchStatus::Failure);
    }
}
