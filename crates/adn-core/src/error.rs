//! Error types for review operations on generated notes.

use thiserror::Error;

use crate::review::LifecycleStage;

/// Errors raised when applying review actions or reading a note.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// The requested action is not offered in the document's current state.
    #[error("Action '{action}' is not available while the document is {stage}")]
    NotOffered {
        action: &'static str,
        stage: LifecycleStage,
    },

    /// The note does not begin with a `---` delimited front matter block.
    #[error("Note has no front matter block")]
    MissingFrontmatter,

    /// The front matter is not valid YAML or is not a mapping.
    #[error("Invalid front matter: {0}")]
    InvalidFrontmatter(String),
}

impl From<serde_yaml::Error> for ReviewError {
    fn from(err: serde_yaml::Error) -> Self {
        ReviewError::InvalidFrontmatter(err.to_string())
    }
}

/// Result type for review operations.
pub type ReviewResult<T> = std::result::Result<T, ReviewError>;
