//! Lifecycle stages of a generated note.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical workflow stage attached to a document.
///
/// Every stage except [`LifecycleStage::InExtraction`] is derived from the two
/// reviewer decisions. `InExtraction` is entered by an explicit action and
/// survives recomputation until it is explicitly left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    /// Freshly generated, no review yet
    #[default]
    Obtained,
    InFirstReview,
    InSecondReview,
    ApprovedFinal,
    RejectedFinal,
    /// Sticky stage set by the "begin extraction" action
    InExtraction,
}

impl LifecycleStage {
    /// All stages in workflow order
    pub const ALL: [LifecycleStage; 6] = [
        LifecycleStage::Obtained,
        LifecycleStage::InFirstReview,
        LifecycleStage::InSecondReview,
        LifecycleStage::ApprovedFinal,
        LifecycleStage::RejectedFinal,
        LifecycleStage::InExtraction,
    ];

    /// Token written to the `estado` front matter key
    pub fn as_token(self) -> &'static str {
        match self {
            LifecycleStage::Obtained => "obtained",
            LifecycleStage::InFirstReview => "in_first_review",
            LifecycleStage::InSecondReview => "in_second_review",
            LifecycleStage::ApprovedFinal => "approved_final",
            LifecycleStage::RejectedFinal => "rejected_final",
            LifecycleStage::InExtraction => "in_extraction",
        }
    }

    /// Parse a stage token. Unknown or empty text reads as `Obtained`.
    ///
    /// `obtenido-motor` is the token older notes were generated with.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "in_first_review" => LifecycleStage::InFirstReview,
            "in_second_review" => LifecycleStage::InSecondReview,
            "approved_final" => LifecycleStage::ApprovedFinal,
            "rejected_final" => LifecycleStage::RejectedFinal,
            "in_extraction" => LifecycleStage::InExtraction,
            "obtained" | "obtenido-motor" => LifecycleStage::Obtained,
            other => {
                if !other.is_empty() {
                    tracing::debug!(stage = %other, "Unknown lifecycle stage, reading as obtained");
                }
                LifecycleStage::Obtained
            }
        }
    }

    /// Whether the stage is a final review outcome
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LifecycleStage::ApprovedFinal | LifecycleStage::RejectedFinal
        )
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}
