//! PDF record source
//!
//! Only file-level metadata is read. Each file is checked for existence, a
//! `.pdf` extension, a `%PDF-` header and a non-zero size; a file that fails
//! any check becomes a per-record failure rather than aborting the batch.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use adn_core::DocumentId;
use globset::GlobBuilder;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::record::{RawRecord, RecordIter, RecordSource, SourceFailure};

/// Default pattern for directory discovery
pub const DEFAULT_PATTERN: &str = "*.pdf";

const PDF_MAGIC: &[u8] = b"%PDF-";

/// A list of PDF files
#[derive(Debug, Clone, Default)]
pub struct PdfSource {
    files: Vec<PathBuf>,
}

impl PdfSource {
    /// Use an explicit list of files, in the order given.
    pub fn from_files(files: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            files: files.into_iter().collect(),
        }
    }

    /// Files directly inside `dir` whose name matches `pattern`
    /// (case-insensitive) and that have a `.pdf` extension. Sorted by path.
    pub fn from_dir(dir: &Path, pattern: &str) -> PipelineResult<Self> {
        if !dir.exists() {
            return Err(PipelineError::SourceNotFound(dir.to_path_buf()));
        }
        if !dir.is_dir() {
            return Err(PipelineError::NotADirectory(dir.to_path_buf()));
        }

        let matcher = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map_err(|e| PipelineError::Pattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?
            .compile_matcher();

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let matches = path
                .file_name()
                .is_some_and(|name| matcher.is_match(Path::new(name)));
            if matches && path.is_file() && has_pdf_extension(&path) {
                files.push(path);
            }
        }
        files.sort();

        debug!("Found {} PDF files in {}", files.len(), dir.display());
        Ok(Self { files })
    }

    /// Files matching a glob expression such as `papers/**/*.pdf`
    pub fn from_glob(expression: &str) -> PipelineResult<Self> {
        let paths = glob::glob(expression).map_err(|e| PipelineError::Pattern {
            pattern: expression.to_string(),
            message: e.to_string(),
        })?;

        let mut files: Vec<PathBuf> = paths
            .filter_map(Result::ok)
            .filter(|p| p.is_file() && has_pdf_extension(p))
            .collect();
        files.sort();

        debug!("Glob '{}' matched {} PDF files", expression, files.len());
        Ok(Self { files })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl RecordSource for PdfSource {
    fn describe(&self) -> String {
        format!("{} PDF files", self.files.len())
    }

    fn validate(&self) -> PipelineResult<()> {
        // Individual files are checked per record
        Ok(())
    }

    fn records(&self) -> PipelineResult<RecordIter> {
        let files = self.files.clone();
        let iter = files.into_iter().enumerate().map(|(ordinal, path)| {
            let label = path.display().to_string();
            match inspect_pdf(&path) {
                Ok(size) => Ok(pdf_record(ordinal, path, label, size)),
                Err(reason) => Err(SourceFailure {
                    ordinal,
                    label,
                    reason,
                }),
            }
        });
        Ok(Box::new(iter))
    }

    fn count(&self) -> PipelineResult<usize> {
        Ok(self.files.len())
    }
}

fn pdf_record(ordinal: usize, path: PathBuf, label: String, size: u64) -> RawRecord {
    let text = |s: Option<&std::ffi::OsStr>| {
        s.map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    let mut fields = BTreeMap::new();
    fields.insert("file_stem".to_string(), text(path.file_stem()));
    fields.insert("file_name".to_string(), text(path.file_name()));
    fields.insert("file_path".to_string(), path.display().to_string());
    fields.insert("file_size".to_string(), format_bytes(size));

    RawRecord {
        ordinal,
        id: DocumentId::Path(path),
        label,
        fields,
    }
}

pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Check that `path` looks like a PDF and return its size.
pub fn inspect_pdf(path: &Path) -> Result<u64, String> {
    if !path.exists() {
        return Err(format!("file does not exist: {}", path.display()));
    }
    if !path.is_file() {
        return Err(format!("not a file: {}", path.display()));
    }
    if !has_pdf_extension(path) {
        return Err(format!("no .pdf extension: {}", path.display()));
    }

    let size = std::fs::metadata(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?
        .len();
    if size == 0 {
        return Err(format!("file is empty: {}", path.display()));
    }

    let mut header = [0u8; 5];
    File::open(path)
        .and_then(|mut f| f.read_exact(&mut header))
        .map_err(|_| format!("no PDF header: {}", path.display()))?;
    if header != PDF_MAGIC {
        return Err(format!("no PDF header: {}", path.display()));
    }

    Ok(size)
}

/// Human readable size (`1.5 MB`)
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} PB")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use test_case::test_case;

    #[test_case(0 => "0.0 B")]
    #[test_case(512 => "512.0 B")]
    #[test_case(1536 => "1.5 KB")]
    #[test_case(5 * 1024 * 1024 => "5.0 MB")]
    fn bytes_are_humanized(bytes: u64) -> String {
        format_bytes(bytes)
    }

    #[test]
    fn inspect_rejects_bad_files() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty.pdf");
        let fake = dir.path().join("fake.pdf");
        let text = dir.path().join("notes.txt");
        fs::write(&empty, b"").unwrap();
        fs::write(&fake, b"hello world").unwrap();
        fs::write(&text, b"%PDF-1.4").unwrap();

        assert!(inspect_pdf(&empty).unwrap_err().contains("empty"));
        assert!(inspect_pdf(&fake).unwrap_err().contains("header"));
        assert!(inspect_pdf(&text).unwrap_err().contains("extension"));
        assert!(inspect_pdf(&dir.path().join("gone.pdf")).is_err());
    }

    #[test]
    fn dir_discovery_is_case_insensitive_and_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["b.PDF", "a.pdf", "c.txt", "report_1.pdf"] {
            fs::write(dir.path().join(name), b"%PDF-1.7\n").unwrap();
        }
        fs::create_dir(dir.path().join("sub.pdf")).unwrap();

        let source = PdfSource::from_dir(dir.path(), DEFAULT_PATTERN).unwrap();
        let names: Vec<_> = source
            .files()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.pdf", "b.PDF", "report_1.pdf"]);

        let reports = PdfSource::from_dir(dir.path(), "report_*.pdf").unwrap();
        assert_eq!(reports.files().len(), 1);
    }

    #[test]
    fn records_carry_file_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Paper One.pdf");
        fs::write(&path, b"%PDF-1.4 content").unwrap();

        let source = PdfSource::from_files(vec![path.clone()]);
        let record = source.records().unwrap().next().unwrap().unwrap();
        assert_eq!(record.field("file_stem"), "Paper One");
        assert_eq!(record.field("file_name"), "Paper One.pdf");
        assert_eq!(record.field("file_size"), "16.0 B");
        assert_eq!(record.source_path(), Some(path.as_path()));
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            PdfSource::from_dir(&dir.path().join("none"), DEFAULT_PATTERN),
            Err(PipelineError::SourceNotFound(_))
        ));
    }
}
