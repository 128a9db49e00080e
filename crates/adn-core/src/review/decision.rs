//! Reviewer decisions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single reviewer's judgment on a document.
///
/// Raw text coming from front matter or the command line goes through
/// [`ReviewDecision::parse`], which never fails: anything other than the two
/// canonical tokens is read as [`ReviewDecision::Unset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    /// No decision recorded yet
    #[default]
    Unset,
    /// Reviewer approved the document
    Approved,
    /// Reviewer rejected the document
    Rejected,
}

impl ReviewDecision {
    /// Parse free-form text (trimmed, case-insensitive).
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "approved" => ReviewDecision::Approved,
            "rejected" => ReviewDecision::Rejected,
            _ => ReviewDecision::Unset,
        }
    }

    /// Parse an optional value, treating absence as unset.
    pub fn parse_opt(raw: Option<&str>) -> Self {
        raw.map(Self::parse).unwrap_or_default()
    }

    /// Whether a reviewer has chosen approve or reject
    pub fn is_chosen(self) -> bool {
        !matches!(self, ReviewDecision::Unset)
    }

    /// Status fragment used in tags (`unreviewed`, `approved`, `rejected`)
    pub fn status(self) -> &'static str {
        match self {
            ReviewDecision::Unset => "unreviewed",
            ReviewDecision::Approved => "approved",
            ReviewDecision::Rejected => "rejected",
        }
    }

    /// Token written to front matter; unset is written as an empty value.
    pub fn as_token(self) -> &'static str {
        match self {
            ReviewDecision::Unset => "",
            ReviewDecision::Approved => "approved",
            ReviewDecision::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        assert_eq!(ReviewDecision::parse("  Approved "), ReviewDecision::Approved);
        assert_eq!(ReviewDecision::parse("REJECTED"), ReviewDecision::Rejected);
    }

    #[test]
    fn parse_treats_unknown_values_as_unset() {
        for raw in ["", "   ", "yes", "aprobado", "approve", "null", "approved!"] {
            assert_eq!(ReviewDecision::parse(raw), ReviewDecision::Unset, "raw={raw:?}");
        }
        assert_eq!(ReviewDecision::parse_opt(None), ReviewDecision::Unset);
    }

    #[test]
    fn status_fragments() {
        assert_eq!(ReviewDecision::Unset.status(), "unreviewed");
        assert_eq!(ReviewDecision::Approved.status(), "approved");
        assert_eq!(ReviewDecision::Rejected.status(), "rejected");
        assert!(!ReviewDecision::Unset.is_chosen());
        assert!(ReviewDecision::Rejected.is_chosen());
    }
}
