//! Stage derivation engine
//!
//! Maps the two reviewer decisions and the current stage to the next stage and
//! a freshly computed tag set. The engine is a total function: it never
//! errors, and every combination of inputs lands on a defined branch.
//!
//! ## Transition table (first match wins)
//!
//! | current stage   | first    | second   | next stage         |
//! |-----------------|----------|----------|--------------------|
//! | `in_extraction` | any      | any      | `in_extraction`    |
//! | any             | unset    | unset    | `obtained`         |
//! | any             | rejected | (unread) | `rejected_final`   |
//! | any             | approved | unset    | `in_second_review` |
//! | any             | approved | approved | `approved_final`   |
//! | any             | approved | rejected | `rejected_final`   |
//! | any             | unset    | chosen   | `obtained`         |

use serde::{Deserialize, Serialize};

use super::decision::ReviewDecision;
use super::stage::LifecycleStage;
use super::tags::TagSet;

/// Output of a derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    pub stage: LifecycleStage,
    pub tags: TagSet,
}

impl Derivation {
    /// Result for a record that has just been created
    pub fn initial() -> Self {
        derive(
            ReviewDecision::Unset,
            ReviewDecision::Unset,
            LifecycleStage::Obtained,
        )
    }
}

/// Derive the next stage and tag set.
pub fn derive(
    first: ReviewDecision,
    second: ReviewDecision,
    current: LifecycleStage,
) -> Derivation {
    let tags = TagSet::from_decisions(first, second);
    let stage = next_stage(first, second, current);
    Derivation { stage, tags }
}

/// Derive from free-form text as found in front matter.
pub fn derive_raw(first: &str, second: &str, current: &str) -> Derivation {
    derive(
        ReviewDecision::parse(first),
        ReviewDecision::parse(second),
        LifecycleStage::parse(current),
    )
}

fn next_stage(
    first: ReviewDecision,
    second: ReviewDecision,
    current: LifecycleStage,
) -> LifecycleStage {
    use ReviewDecision::{Approved, Rejected, Unset};

    if current == LifecycleStage::InExtraction {
        return LifecycleStage::InExtraction;
    }

    match (first, second) {
        (Unset, Unset) => LifecycleStage::Obtained,
        (Rejected, _) => LifecycleStage::RejectedFinal,
        (Approved, Unset) => LifecycleStage::InSecondReview,
        (Approved, Approved) => LifecycleStage::ApprovedFinal,
        (Approved, Rejected) => LifecycleStage::RejectedFinal,
        // Only reachable from a front matter edited by hand
        (Unset, _) => {
            tracing::debug!(?second, "Second decision set without a first decision");
            LifecycleStage::Obtained
        }
    }
}
