//! # ADN Batch Pipeline
//!
//! Converts record sources (PDF files, CSV rows) into Markdown notes with a
//! review front matter.
//!
//! ## Architecture
//!
//! ```text
//! BatchPipeline (orchestration)
//!   ├─> RecordSource      CsvSource | PdfSource
//!   ├─> OutputLayout      numbered or derived from the source name
//!   ├─> adn_core::review  initial stage and tags
//!   ├─> TemplateRenderer  TemplateEngine
//!   └─> OutputWriter      FsOutputWriter
//! ```
//!
//! Renderer and writer are injected as trait objects so tests can replace
//! either one.

pub mod batch;
pub mod csv_source;
pub mod error;
pub mod naming;
pub mod pdf_source;
pub mod record;
pub mod report;
pub mod template;
pub mod writer;

pub use batch::{BatchConfig, BatchPipeline};
pub use csv_source::{CsvSource, REQUIRED_COLUMNS};
pub use error::{PipelineError, PipelineResult, RecordError, RenderError, RenderResult};
pub use naming::{clean_filename, derived_output_path, OutputLayout};
pub use pdf_source::{format_bytes, PdfSource, DEFAULT_PATTERN};
pub use record::{RawRecord, RecordIter, RecordSource, SourceFailure, SourceItem};
pub use report::{BatchStatus, ProcessingReport, RecordOutcome, RecordReport};
pub use template::{TemplateContext, TemplateEngine, TemplateRenderer, CSV_TEMPLATE, DEFAULT_TEMPLATE};
pub use writer::{FsOutputWriter, OutputWriter};
