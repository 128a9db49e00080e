//! Generated documents and their review state
//!
//! A [`Document`] is created once per source record. Its stage and tags are
//! never set directly: every decision change goes through
//! [`Document::apply`], which checks the action against [`ReviewControls`]
//! and then re-runs the derivation engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::{ReviewError, ReviewResult};
use crate::review::{
    derive, Derivation, LifecycleStage, ReviewControls, ReviewDecision, StageRegression, TagSet,
};

/// Identity of a document: the record it was generated from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentId {
    /// Generated from a file (PDF source, or a note reopened from disk)
    Path(PathBuf),
    /// Generated from a CSV row (zero-based ordinal)
    Row(usize),
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Path(path) => write!(f, "{}", path.display()),
            DocumentId::Row(ordinal) => write!(f, "row {}", ordinal + 1),
        }
    }
}

/// Raw metadata carried from the source record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    /// DOI or other external identifier
    pub identifier: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub source: String,
    /// Any other field the record carried
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

/// A review action requested by a reviewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    SetFirst(ReviewDecision),
    SetSecond(ReviewDecision),
    BeginExtraction,
    ReturnToPrevious,
}

impl ReviewAction {
    pub fn name(self) -> &'static str {
        match self {
            ReviewAction::SetFirst(_) => "set first decision",
            ReviewAction::SetSecond(_) => "set second decision",
            ReviewAction::BeginExtraction => "begin extraction",
            ReviewAction::ReturnToPrevious => "return to previous stage",
        }
    }
}

/// Snapshot of a document's review state, as handed to presenters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewView {
    pub document: String,
    pub first_decision: ReviewDecision,
    pub second_decision: ReviewDecision,
    pub stage: LifecycleStage,
    pub tags: TagSet,
    pub controls: ReviewControls,
}

/// A generated note and its review state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub metadata: DocumentMetadata,
    pub output_path: Option<PathBuf>,
    first_decision: ReviewDecision,
    second_decision: ReviewDecision,
    stage: LifecycleStage,
    tags: TagSet,
}

impl Document {
    /// Create a document with no reviewer input
    pub fn new(id: DocumentId, metadata: DocumentMetadata) -> Self {
        let Derivation { stage, tags } = Derivation::initial();
        Self {
            id,
            metadata,
            output_path: None,
            first_decision: ReviewDecision::Unset,
            second_decision: ReviewDecision::Unset,
            stage,
            tags,
        }
    }

    /// Rebuild a document from persisted review fields.
    ///
    /// The stored stage is only trusted when it is the sticky extraction
    /// stage; anything else is recomputed from the decisions.
    pub fn restore(
        id: DocumentId,
        metadata: DocumentMetadata,
        first: ReviewDecision,
        second: ReviewDecision,
        stored_stage: LifecycleStage,
    ) -> Self {
        let Derivation { stage, tags } = derive(first, second, stored_stage);
        Self {
            id,
            metadata,
            output_path: None,
            first_decision: first,
            second_decision: second,
            stage,
            tags,
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn first_decision(&self) -> ReviewDecision {
        self.first_decision
    }

    pub fn second_decision(&self) -> ReviewDecision {
        self.second_decision
    }

    pub fn stage(&self) -> LifecycleStage {
        self.stage
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn controls(&self) -> ReviewControls {
        ReviewControls::compute(self.first_decision, self.second_decision, self.stage)
    }

    pub fn view(&self) -> ReviewView {
        ReviewView {
            document: self.id.to_string(),
            first_decision: self.first_decision,
            second_decision: self.second_decision,
            stage: self.stage,
            tags: self.tags.clone(),
            controls: self.controls(),
        }
    }

    /// Apply a review action and recompute stage and tags.
    pub fn apply(&mut self, action: ReviewAction) -> ReviewResult<()> {
        let controls = self.controls();
        let not_offered = || ReviewError::NotOffered {
            action: action.name(),
            stage: self.stage,
        };

        match action {
            ReviewAction::SetFirst(decision) => {
                if !controls.first_decision_enabled {
                    return Err(not_offered());
                }
                // A second decision only survives while the first stays approved.
                if decision != ReviewDecision::Approved
                    || self.first_decision != ReviewDecision::Approved
                {
                    self.second_decision = ReviewDecision::Unset;
                }
                self.first_decision = decision;
            }
            ReviewAction::SetSecond(decision) => {
                if !controls.second_decision_enabled {
                    return Err(not_offered());
                }
                self.second_decision = decision;
            }
            ReviewAction::BeginExtraction => {
                if !controls.can_begin_extraction {
                    return Err(not_offered());
                }
                self.stage = LifecycleStage::InExtraction;
            }
            ReviewAction::ReturnToPrevious => match controls.regression {
                Some(StageRegression::LeaveExtraction) => {
                    self.stage = LifecycleStage::ApprovedFinal;
                }
                Some(StageRegression::ReopenSecondReview) => {
                    self.second_decision = ReviewDecision::Unset;
                }
                Some(StageRegression::ReopenFirstReview) => {
                    self.first_decision = ReviewDecision::Unset;
                    self.second_decision = ReviewDecision::Unset;
                }
                None => return Err(not_offered()),
            },
        }

        self.recompute();
        tracing::debug!(
            document = %self.id,
            stage = %self.stage,
            "Applied review action: {}",
            action.name()
        );
        Ok(())
    }

    /// Re-run the derivation engine over the current fields
    pub fn recompute(&mut self) {
        let Derivation { stage, tags } =
            derive(self.first_decision, self.second_decision, self.stage);
        self.stage = stage;
        self.tags = tags;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReviewDecision::{Approved, Rejected, Unset};

    fn doc() -> Document {
        Document::new(DocumentId::Row(0), DocumentMetadata::default())
    }

    #[test]
    fn new_document_is_obtained() {
        let d = doc();
        assert_eq!(d.stage(), LifecycleStage::Obtained);
        assert_eq!(
            d.tags().as_slice(),
            ["document", "first-unreviewed", "second-unreviewed"]
        );
    }

    #[test]
    fn full_approval_then_extraction_and_back() {
        let mut d = doc();
        d.apply(ReviewAction::SetFirst(Approved)).unwrap();
        assert_eq!(d.stage(), LifecycleStage::InSecondReview);

        d.apply(ReviewAction::SetSecond(Approved)).unwrap();
        assert_eq!(d.stage(), LifecycleStage::ApprovedFinal);

        d.apply(ReviewAction::BeginExtraction).unwrap();
        assert_eq!(d.stage(), LifecycleStage::InExtraction);
        d.recompute();
        assert_eq!(d.stage(), LifecycleStage::InExtraction);

        d.apply(ReviewAction::ReturnToPrevious).unwrap();
        assert_eq!(d.stage(), LifecycleStage::ApprovedFinal);

        d.apply(ReviewAction::ReturnToPrevious).unwrap();
        assert_eq!(d.stage(), LifecycleStage::InSecondReview);
        assert_eq!(d.second_decision(), Unset);

        d.apply(ReviewAction::ReturnToPrevious).unwrap();
        assert_eq!(d.stage(), LifecycleStage::Obtained);
        assert_eq!(d.first_decision(), Unset);

        assert!(d.apply(ReviewAction::ReturnToPrevious).is_err());
    }

    #[test]
    fn decisions_locked_during_extraction() {
        let mut d = Document::restore(
            DocumentId::Row(3),
            DocumentMetadata::default(),
            Approved,
            Approved,
            LifecycleStage::InExtraction,
        );
        let err = d.apply(ReviewAction::SetFirst(Rejected)).unwrap_err();
        assert!(matches!(err, ReviewError::NotOffered { .. }));
        assert!(d.apply(ReviewAction::SetSecond(Rejected)).is_err());
        assert_eq!(d.stage(), LifecycleStage::InExtraction);
    }

    #[test]
    fn second_decision_needs_first_approval() {
        let mut d = doc();
        assert!(d.apply(ReviewAction::SetSecond(Approved)).is_err());
        d.apply(ReviewAction::SetFirst(Rejected)).unwrap();
        assert_eq!(d.stage(), LifecycleStage::RejectedFinal);
        assert!(d.apply(ReviewAction::SetSecond(Approved)).is_err());
    }

    #[test]
    fn stale_second_decision_does_not_block_first_review() {
        let mut d = Document::restore(
            DocumentId::Row(7),
            DocumentMetadata::default(),
            Rejected,
            Approved,
            LifecycleStage::RejectedFinal,
        );
        assert_eq!(d.stage(), LifecycleStage::RejectedFinal);

        d.apply(ReviewAction::SetFirst(Approved)).unwrap();
        assert_eq!(d.stage(), LifecycleStage::InSecondReview);
        assert_eq!(d.second_decision(), Unset);

        let mut reopened = Document::restore(
            DocumentId::Row(8),
            DocumentMetadata::default(),
            Rejected,
            Approved,
            LifecycleStage::RejectedFinal,
        );
        reopened.apply(ReviewAction::ReturnToPrevious).unwrap();
        assert_eq!(reopened.stage(), LifecycleStage::Obtained);
        assert_eq!(reopened.first_decision(), Unset);
    }

    #[test]
    fn extraction_requires_approved_final() {
        let mut d = doc();
        d.apply(ReviewAction::SetFirst(Approved)).unwrap();
        assert!(d.apply(ReviewAction::BeginExtraction).is_err());
    }

    #[test]
    fn restore_ignores_stale_non_sticky_stage() {
        let d = Document::restore(
            DocumentId::Path("note.md".into()),
            DocumentMetadata::default(),
            Approved,
            Rejected,
            LifecycleStage::InFirstReview,
        );
        assert_eq!(d.stage(), LifecycleStage::RejectedFinal);
        assert_eq!(d.view().document, "note.md");
    }
}
