//! Error types for batch conversion.
//!
//! [`PipelineError`] stops a batch before any record is touched.
//! [`RecordError`] belongs to a single record and ends up in the report.

use std::path::PathBuf;
use thiserror::Error;

/// Batch-fatal errors, raised while validating the source or the batch
/// configuration.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The source path does not exist.
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The source path is not a regular file.
    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The path given as a directory is not one.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Required CSV columns are absent (sorted).
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The source could not be decoded or parsed.
    #[error("Could not read {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    /// A file or glob pattern is malformed.
    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// The configured template does not exist.
    #[error(transparent)]
    Template(#[from] RenderError),

    /// The batch configuration is unusable.
    #[error("Invalid batch configuration: {0}")]
    InvalidConfig(String),

    /// IO error while validating the source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Template rendering errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// No template file and no built-in template with this name.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// The template refers to a variable the record does not provide.
    #[error("Unknown variable '{variable}' in template '{template}'")]
    UnknownVariable { template: String, variable: String },

    /// The template applies a filter that does not exist.
    #[error("Unknown filter '{filter}' in template '{template}'")]
    UnknownFilter { template: String, filter: String },

    /// The template file exists but could not be read.
    #[error("Could not read template '{template}': {message}")]
    Unreadable { template: String, message: String },
}

/// Per-record failures. The batch carries on after any of these.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The record could not be read or is not a valid input.
    #[error("{0}")]
    Source(String),

    /// Rendering the note failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// An earlier record of the same batch already produces this note.
    #[error("{} is already produced by {owner}", .path.display())]
    DuplicateOutput { path: PathBuf, owner: String },

    /// Writing the note failed.
    #[error("Could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for batch-level operations.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Result type for template rendering.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
