//! Raw records and the sources that yield them

use std::collections::BTreeMap;
use std::path::Path;

use adn_core::{DocumentId, DocumentMetadata};

use crate::error::PipelineResult;

/// One input record: a PDF file or a CSV row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Zero-based position in the source
    pub ordinal: usize,
    pub id: DocumentId,
    /// Human readable name used in logs and reports
    pub label: String,
    pub fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Path of the source file, for file-backed records
    pub fn source_path(&self) -> Option<&Path> {
        match &self.id {
            DocumentId::Path(path) => Some(path),
            DocumentId::Row(_) => None,
        }
    }

    /// Document metadata carried by this record
    pub fn metadata(&self) -> DocumentMetadata {
        let mut extra = self.fields.clone();
        let mut take = |key: &str| extra.remove(key).unwrap_or_default();

        let title = take("title");
        let identifier = take("doi");
        let abstract_text = take("abstract");
        let source = take("source");

        DocumentMetadata {
            title: if title.is_empty() {
                self.field("file_stem").to_string()
            } else {
                title
            },
            identifier,
            abstract_text,
            source: if source.is_empty() {
                self.field("file_name").to_string()
            } else {
                source
            },
            extra,
        }
    }
}

/// A record that could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub ordinal: usize,
    pub label: String,
    pub reason: String,
}

/// Item yielded by [`RecordSource::records`]
pub type SourceItem = Result<RawRecord, SourceFailure>;

/// Lazy iterator over a source's records
pub type RecordIter = Box<dyn Iterator<Item = SourceItem> + Send>;

/// A finite, restartable sequence of records
pub trait RecordSource: Send + Sync {
    /// Short description for logs
    fn describe(&self) -> String;

    /// Check the source as a whole. Errors here abort the batch.
    fn validate(&self) -> PipelineResult<()>;

    /// Start a fresh pass over the records.
    fn records(&self) -> PipelineResult<RecordIter>;

    /// Number of records, including unreadable ones
    fn count(&self) -> PipelineResult<usize> {
        Ok(self.records()?.count())
    }
}
