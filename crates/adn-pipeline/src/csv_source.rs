//! CSV record source
//!
//! Files are decoded as UTF-8 (with or without BOM), falling back to
//! Windows-1252 when the bytes are not valid UTF-8. Rows are flexible: a
//! short row yields empty values for the missing columns.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use adn_core::DocumentId;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::{debug, info};

use crate::error::{PipelineError, PipelineResult};
use crate::record::{RawRecord, RecordIter, RecordSource, SourceFailure, SourceItem};

/// Columns every CSV must provide
pub const REQUIRED_COLUMNS: [&str; 4] = ["source", "doi", "title", "abstract"];

/// Reads records from a CSV file
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header columns as they appear in the file
    pub fn columns(&self) -> PipelineResult<Vec<String>> {
        let (text, _) = self.read_text()?;
        let mut reader = reader_for(text);
        let headers = reader.headers().map_err(|e| self.decode_error(e))?;
        Ok(headers.iter().map(|h| h.trim().to_string()).collect())
    }

    fn check_path(&self) -> PipelineResult<()> {
        if !self.path.exists() {
            return Err(PipelineError::SourceNotFound(self.path.clone()));
        }
        if !self.path.is_file() {
            return Err(PipelineError::NotAFile(self.path.clone()));
        }
        Ok(())
    }

    fn read_text(&self) -> PipelineResult<(String, &'static Encoding)> {
        self.check_path()?;
        let bytes = std::fs::read(&self.path)?;
        Ok(decode(&bytes))
    }

    fn decode_error(&self, err: csv::Error) -> PipelineError {
        PipelineError::Decode {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }
}

/// Decode CSV bytes, stripping a UTF-8 BOM.
pub fn decode(bytes: &[u8]) -> (String, &'static Encoding) {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return (text.into_owned(), UTF_8);
    }
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    (text.into_owned(), WINDOWS_1252)
}

fn reader_for(text: String) -> csv::Reader<Cursor<Vec<u8>>> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(Cursor::new(text.into_bytes()))
}

impl RecordSource for CsvSource {
    fn describe(&self) -> String {
        format!("CSV {}", self.path.display())
    }

    fn validate(&self) -> PipelineResult<()> {
        let columns: BTreeSet<String> = self.columns()?.into_iter().collect();
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !columns.contains(**c))
            .map(|c| c.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if !missing.is_empty() {
            return Err(PipelineError::MissingColumns(missing));
        }

        info!(
            "CSV validated: {} (columns: {})",
            self.path.display(),
            columns.iter().cloned().collect::<Vec<_>>().join(", ")
        );
        Ok(())
    }

    fn records(&self) -> PipelineResult<RecordIter> {
        let (text, encoding) = self.read_text()?;
        debug!("Reading {} as {}", self.path.display(), encoding.name());

        let mut reader = reader_for(text);
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| self.decode_error(e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let iter = reader
            .into_records()
            .enumerate()
            .map(move |(ordinal, row)| -> SourceItem {
                let label = format!("row {}", ordinal + 1);
                let row = row.map_err(|e| SourceFailure {
                    ordinal,
                    label: label.clone(),
                    reason: e.to_string(),
                })?;

                let mut fields: BTreeMap<String, String> = headers
                    .iter()
                    .map(|h| (h.clone(), String::new()))
                    .collect();
                for (header, value) in headers.iter().zip(row.iter()) {
                    fields.insert(header.clone(), value.trim().to_string());
                }
                for column in REQUIRED_COLUMNS {
                    fields.entry(column.to_string()).or_default();
                }

                Ok(RawRecord {
                    ordinal,
                    id: DocumentId::Row(ordinal),
                    label,
                    fields,
                })
            });

        Ok(Box::new(iter))
    }
}
