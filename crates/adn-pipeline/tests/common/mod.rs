//! Common test utilities for pipeline tests.

#![allow(dead_code)]

use adn_pipeline::{BatchPipeline, FsOutputWriter, TemplateEngine};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const HEADER: &str = "source,doi,title,abstract\n";

/// Write a CSV file with the required header and the given rows.
pub fn write_csv(dir: &Path, rows: &[&str]) -> Result<PathBuf> {
    let path = dir.join("records.csv");
    let mut content = HEADER.to_string();
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Write a minimal file with a PDF header.
pub fn write_pdf(dir: &Path, name: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.4\n%test fixture\n")?;
    Ok(path)
}

/// Pipeline with built-in templates writing UTF-8.
pub fn pipeline() -> BatchPipeline {
    BatchPipeline::new(
        Arc::new(TemplateEngine::builtin()),
        Arc::new(FsOutputWriter::default()),
    )
}

/// Sorted names of the `.md` files in `dir`.
pub fn md_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name.ends_with(".md") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
