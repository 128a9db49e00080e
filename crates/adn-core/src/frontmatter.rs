//! Front matter of generated notes
//!
//! A note starts with a YAML block delimited by `---` lines. [`NoteFile`]
//! keeps that block as an ordered mapping so that writing review state back
//! touches only the review keys and leaves everything else where it was.

use serde_yaml::{Mapping, Value};

use crate::document::{Document, DocumentId, DocumentMetadata};
use crate::error::{ReviewError, ReviewResult};
use crate::review::{LifecycleStage, ReviewDecision};

pub const FIRST_DECISION_KEY: &str = "first_decision";
pub const SECOND_DECISION_KEY: &str = "second_decision";
pub const STAGE_KEY: &str = "estado";
pub const TAGS_KEY: &str = "tags";

const DELIMITER: &str = "---";

/// A note split into its front matter mapping and body text
#[derive(Debug, Clone, PartialEq)]
pub struct NoteFile {
    frontmatter: Mapping,
    body: String,
}

impl NoteFile {
    pub fn parse(text: &str) -> ReviewResult<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let rest = text
            .strip_prefix("---\n")
            .or_else(|| text.strip_prefix("---\r\n"))
            .ok_or(ReviewError::MissingFrontmatter)?;

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == DELIMITER {
                let yaml = &rest[..offset];
                let body = &rest[offset + line.len()..];
                return Ok(Self {
                    frontmatter: parse_mapping(yaml)?,
                    body: body.to_string(),
                });
            }
            offset += line.len();
        }

        Err(ReviewError::MissingFrontmatter)
    }

    pub fn frontmatter(&self) -> &Mapping {
        &self.frontmatter
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// String value of a front matter key; non-string scalars are rendered.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.frontmatter.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn first_decision(&self) -> ReviewDecision {
        ReviewDecision::parse_opt(self.get_str(FIRST_DECISION_KEY).as_deref())
    }

    pub fn second_decision(&self) -> ReviewDecision {
        ReviewDecision::parse_opt(self.get_str(SECOND_DECISION_KEY).as_deref())
    }

    pub fn stage(&self) -> LifecycleStage {
        LifecycleStage::parse(self.get_str(STAGE_KEY).as_deref().unwrap_or_default())
    }

    /// Rebuild the review state stored in this note.
    pub fn to_document(&self, id: DocumentId) -> Document {
        let field = |key: &str| self.get_str(key).unwrap_or_default();
        let metadata = DocumentMetadata {
            title: field("title"),
            identifier: field("doi"),
            abstract_text: field("abstract"),
            source: field("source"),
            ..Default::default()
        };

        Document::restore(
            id,
            metadata,
            self.first_decision(),
            self.second_decision(),
            self.stage(),
        )
    }

    /// Write a document's review state into the front matter.
    pub fn apply_document(&mut self, document: &Document) {
        self.set(
            FIRST_DECISION_KEY,
            Value::String(document.first_decision().as_token().to_string()),
        );
        self.set(
            SECOND_DECISION_KEY,
            Value::String(document.second_decision().as_token().to_string()),
        );
        self.set(
            STAGE_KEY,
            Value::String(document.stage().as_token().to_string()),
        );
        self.set(
            TAGS_KEY,
            Value::Sequence(
                document
                    .tags()
                    .iter()
                    .map(|t| Value::String(t.to_string()))
                    .collect(),
            ),
        );
    }

    fn set(&mut self, key: &str, value: Value) {
        // Existing keys keep their position
        self.frontmatter.insert(Value::String(key.to_string()), value);
    }

    /// Serialize back to note text.
    pub fn render(&self) -> ReviewResult<String> {
        let yaml = if self.frontmatter.is_empty() {
            String::new()
        } else {
            serde_yaml::to_string(&self.frontmatter)?
        };
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{}", self.body))
    }
}

fn parse_mapping(yaml: &str) -> ReviewResult<Mapping> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(ReviewError::InvalidFrontmatter(format!(
            "expected a mapping, found {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ReviewAction;

    const NOTE: &str = "---\nsource: 'Scopus'\ndoi: '10.1/x'\ntitle: \"Paper\"\nabstract: |\n  Line one\n  Line two\nfirst_decision: ''\nsecond_decision: ''\nestado: obtained\ntags:\n  - document\n  - first-unreviewed\n  - second-unreviewed\n---\n\n# Paper\n\nbody text\n";

    #[test]
    fn parses_keys_and_body() {
        let note = NoteFile::parse(NOTE).unwrap();
        assert_eq!(note.get_str("doi").as_deref(), Some("10.1/x"));
        assert_eq!(note.get_str("abstract").as_deref(), Some("Line one\nLine two\n"));
        assert_eq!(note.first_decision(), ReviewDecision::Unset);
        assert_eq!(note.stage(), LifecycleStage::Obtained);
        assert_eq!(note.body(), "\n# Paper\n\nbody text\n");
    }

    #[test]
    fn decisions_round_trip_through_front_matter() {
        let mut note = NoteFile::parse(NOTE).unwrap();
        let mut doc = note.to_document(DocumentId::Path("001.md".into()));
        assert_eq!(doc.metadata.title, "Paper");

        doc.apply(ReviewAction::SetFirst(ReviewDecision::Approved)).unwrap();
        doc.apply(ReviewAction::SetSecond(ReviewDecision::Rejected)).unwrap();
        note.apply_document(&doc);

        let reparsed = NoteFile::parse(&note.render().unwrap()).unwrap();
        assert_eq!(reparsed.first_decision(), ReviewDecision::Approved);
        assert_eq!(reparsed.second_decision(), ReviewDecision::Rejected);
        assert_eq!(reparsed.stage(), LifecycleStage::RejectedFinal);
        assert_eq!(reparsed.body(), note.body());
        assert_eq!(reparsed.get_str("source").as_deref(), Some("Scopus"));

        let tags = reparsed.frontmatter().get("tags").unwrap();
        assert_eq!(
            serde_yaml::to_string(tags).unwrap(),
            "- document\n- first-approved\n- second-rejected\n"
        );
    }

    #[test]
    fn key_order_is_preserved() {
        let mut note = NoteFile::parse(NOTE).unwrap();
        let doc = note.to_document(DocumentId::Row(0));
        note.apply_document(&doc);
        let keys: Vec<_> = note
            .frontmatter()
            .keys()
            .filter_map(|k| k.as_str())
            .collect();
        assert_eq!(
            keys,
            [
                "source",
                "doi",
                "title",
                "abstract",
                "first_decision",
                "second_decision",
                "estado",
                "tags"
            ]
        );
    }

    #[test]
    fn legacy_stage_token_reads_as_obtained() {
        let note = NoteFile::parse("---\nestado: obtenido-motor\n---\n").unwrap();
        assert_eq!(note.stage(), LifecycleStage::Obtained);
        assert_eq!(note.body(), "");
    }

    #[test]
    fn missing_or_broken_front_matter() {
        assert!(matches!(
            NoteFile::parse("# no front matter"),
            Err(ReviewError::MissingFrontmatter)
        ));
        assert!(matches!(
            NoteFile::parse("---\nestado: obtained\n"),
            Err(ReviewError::MissingFrontmatter)
        ));
        assert!(matches!(
            NoteFile::parse("---\n- a\n- b\n---\n"),
            Err(ReviewError::InvalidFrontmatter(_))
        ));
    }
}
