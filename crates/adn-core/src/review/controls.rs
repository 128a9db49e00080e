//! Review control gating
//!
//! Frontends use [`ReviewControls`] to decide which inputs and actions to show
//! for a document. The rules are computed from the decisions and the current
//! stage, independently of the engine's output, and are safe to recompute as
//! often as needed.

use serde::{Deserialize, Serialize};

use super::decision::ReviewDecision;
use super::stage::LifecycleStage;

/// A single step back through the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageRegression {
    /// Leave extraction and return to `approved_final`
    LeaveExtraction,
    /// Clear the second decision and reopen the second review
    ReopenSecondReview,
    /// Clear the first decision and return to pre-review
    ReopenFirstReview,
}

impl StageRegression {
    pub fn label(self) -> &'static str {
        match self {
            StageRegression::LeaveExtraction => "return to approved",
            StageRegression::ReopenSecondReview => "reopen second review",
            StageRegression::ReopenFirstReview => "reopen first review",
        }
    }
}

/// Which review inputs and actions are offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewControls {
    pub first_decision_enabled: bool,
    pub second_decision_enabled: bool,
    pub can_begin_extraction: bool,
    /// The only backward step offered, if any
    pub regression: Option<StageRegression>,
}

impl ReviewControls {
    pub fn compute(
        first: ReviewDecision,
        second: ReviewDecision,
        stage: LifecycleStage,
    ) -> Self {
        let extracting = stage == LifecycleStage::InExtraction;
        // A second decision only counts once the first one approved.
        let counted_second = if first == ReviewDecision::Approved {
            second
        } else {
            ReviewDecision::Unset
        };
        let both_chosen = first.is_chosen() && counted_second.is_chosen();

        let second_decision_enabled = first == ReviewDecision::Approved && !extracting;
        let first_decision_enabled = !both_chosen && !extracting;
        let can_begin_extraction = first == ReviewDecision::Approved
            && second == ReviewDecision::Approved
            && !extracting;

        let regression = if extracting {
            Some(StageRegression::LeaveExtraction)
        } else if stage.is_terminal() && both_chosen {
            Some(StageRegression::ReopenSecondReview)
        } else if first.is_chosen() && !counted_second.is_chosen() {
            Some(StageRegression::ReopenFirstReview)
        } else {
            None
        };

        Self {
            first_decision_enabled,
            second_decision_enabled,
            can_begin_extraction,
            regression,
        }
    }
}
