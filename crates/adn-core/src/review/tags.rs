//! Classification tags derived from reviewer decisions.

use serde::{Deserialize, Serialize};

use super::decision::ReviewDecision;

/// Base tag present on every generated note
pub const DOCUMENT_TAG: &str = "document";

/// Ordered tag list: `document` first, then the first and second review status.
///
/// A tag set is always rebuilt from scratch; there is no way to add or remove
/// individual tags, so stale review tags cannot survive a recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Build the tag set for a pair of decisions
    pub fn from_decisions(first: ReviewDecision, second: ReviewDecision) -> Self {
        Self(vec![
            DOCUMENT_TAG.to_string(),
            format!("first-{}", first.status()),
            format!("second-{}", second.status()),
        ])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Render as an indented YAML list (one `  - tag` line per entry)
    pub fn to_yaml_list(&self) -> String {
        self.0
            .iter()
            .map(|t| format!("  - {}", t))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for TagSet {
    fn default() -> Self {
        Self::from_decisions(ReviewDecision::Unset, ReviewDecision::Unset)
    }
}

impl From<TagSet> for Vec<String> {
    fn from(tags: TagSet) -> Self {
        tags.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tags_are_unreviewed() {
        let tags = TagSet::default();
        assert_eq!(
            tags.as_slice(),
            ["document", "first-unreviewed", "second-unreviewed"]
        );
    }

    #[test]
    fn yaml_list_keeps_order() {
        let tags = TagSet::from_decisions(ReviewDecision::Approved, ReviewDecision::Rejected);
        assert_eq!(
            tags.to_yaml_list(),
            "  - document\n  - first-approved\n  - second-rejected"
        );
        assert!(tags.contains("second-rejected"));
    }
}
