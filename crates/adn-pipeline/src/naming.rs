//! Output file naming

use std::path::{Path, PathBuf};

use crate::error::RecordError;
use crate::record::RawRecord;

const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Where and under which name each record's note is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLayout {
    /// `{start_number + ordinal:03}.md` inside `dir` (CSV rows)
    Numbered { dir: PathBuf, start_number: usize },
    /// Cleaned source stem plus `suffix` and `.md`, inside `dir` or, when
    /// `dir` is `None`, next to the source file (PDFs)
    SourceStem {
        dir: Option<PathBuf>,
        suffix: String,
        max_filename_length: usize,
    },
}

impl OutputLayout {
    pub fn path_for(&self, record: &RawRecord) -> Result<PathBuf, RecordError> {
        match self {
            OutputLayout::Numbered { dir, start_number } => {
                Ok(dir.join(numbered_name(start_number + record.ordinal)))
            }
            OutputLayout::SourceStem {
                dir,
                suffix,
                max_filename_length,
            } => {
                let source = record.source_path().ok_or_else(|| {
                    RecordError::Source(format!("{} has no source file", record.label))
                })?;
                Ok(derived_output_path(
                    source,
                    dir.as_deref(),
                    suffix,
                    *max_filename_length,
                ))
            }
        }
    }
}

pub fn numbered_name(number: usize) -> String {
    format!("{number:03}.md")
}

/// Note path for a source file
pub fn derived_output_path(
    source: &Path,
    dir: Option<&Path>,
    suffix: &str,
    max_filename_length: usize,
) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{}{suffix}.md", clean_filename(&stem, max_filename_length));

    let dir = dir
        .map(Path::to_path_buf)
        .or_else(|| source.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(name)
}

/// Make `name` safe as a file name: reserved characters become `_`, runs of
/// whitespace become a single `_`, and the result is cut to `max_len`
/// characters keeping any extension.
pub fn clean_filename(name: &str, max_len: usize) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let cleaned = replaced.split_whitespace().collect::<Vec<_>>().join("_");

    if cleaned.chars().count() <= max_len {
        return cleaned;
    }

    let (base, ext) = split_extension(&cleaned);
    let ext_len = ext.chars().count();
    if ext_len >= max_len {
        return cleaned.chars().take(max_len).collect();
    }
    let keep = max_len - ext_len;
    let mut truncated: String = base.chars().take(keep).collect();
    truncated.push_str(ext);
    truncated
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adn_core::DocumentId;
    use proptest::prelude::*;
    use std::collections::BTreeMap;
    use test_case::test_case;

    #[test_case("Paper One", 100 => "Paper_One")]
    #[test_case("a  b\tc", 100 => "a_b_c")]
    #[test_case("what?<now>:x", 100 => "what__now__x")]
    #[test_case("abcdefghijklmnop.pdf", 10 => "abcdef.pdf")]
    #[test_case("abcdefghijklmnop", 10 => "abcdefghij")]
    fn cleaning(name: &str, max: usize) -> String {
        clean_filename(name, max)
    }

    #[test]
    fn numbered_names_are_zero_padded() {
        assert_eq!(numbered_name(1), "001.md");
        assert_eq!(numbered_name(14), "014.md");
        assert_eq!(numbered_name(1234), "1234.md");
    }

    #[test]
    fn derived_path_beside_source_or_in_dir() {
        let source = Path::new("/papers/My Paper.pdf");
        assert_eq!(
            derived_output_path(source, None, "_extraccion", 100),
            PathBuf::from("/papers/My_Paper_extraccion.md")
        );
        assert_eq!(
            derived_output_path(source, Some(Path::new("/notes")), "_x", 100),
            PathBuf::from("/notes/My_Paper_x.md")
        );
    }

    #[test]
    fn numbered_layout_uses_ordinal() {
        let layout = OutputLayout::Numbered {
            dir: PathBuf::from("out"),
            start_number: 10,
        };
        let record = RawRecord {
            ordinal: 4,
            id: DocumentId::Row(4),
            label: "row 5".into(),
            fields: BTreeMap::new(),
        };
        assert_eq!(layout.path_for(&record).unwrap(), PathBuf::from("out/014.md"));

        let stem_layout = OutputLayout::SourceStem {
            dir: None,
            suffix: "_x".into(),
            max_filename_length: 100,
        };
        assert!(stem_layout.path_for(&record).is_err());
    }

    proptest! {
        #[test]
        fn cleaned_names_are_safe(name in ".{0,300}", max in 10usize..=255) {
            let cleaned = clean_filename(&name, max);
            prop_assert!(cleaned.chars().count() <= max);
            prop_assert!(!cleaned.contains(INVALID_CHARS));
            prop_assert!(!cleaned.chars().any(char::is_whitespace));
        }
    }
}
