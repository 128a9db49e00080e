//! list-files, status and clean

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

use adn_core::{LifecycleStage, NoteFile};
use adn_pipeline::{csv_source::decode, derived_output_path, format_bytes, PdfSource, DEFAULT_PATTERN};

use crate::context::AppContext;
use crate::output;

/// Patterns removed by `clean`, relative to the target directory
pub const TEMP_PATTERNS: [&str; 4] = ["*.tmp", "*.temp", "*~", ".adn_cache/*"];

const PENDING_PREVIEW: usize = 5;

fn target_dir(directory: Option<PathBuf>) -> Result<PathBuf> {
    let dir = directory.unwrap_or_else(|| PathBuf::from("."));
    if !dir.is_dir() {
        bail!("Directory {} does not exist", dir.display());
    }
    Ok(dir)
}

fn is_processed(ctx: &AppContext, pdf: &Path) -> bool {
    derived_output_path(
        pdf,
        None,
        &ctx.config.output_suffix,
        ctx.config.max_filename_length,
    )
    .exists()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Execute list-files
pub fn list(
    ctx: &AppContext,
    directory: Option<PathBuf>,
    pattern: &str,
    include_processed: bool,
) -> Result<()> {
    let dir = target_dir(directory)?;
    let source = PdfSource::from_dir(&dir, pattern)
        .with_context(|| format!("Cannot scan {}", dir.display()))?;

    if source.is_empty() {
        output::warning(&format!("No PDF files found in {}", dir.display()));
        return Ok(());
    }

    let mut rows = Vec::new();
    let mut hidden = 0;
    for pdf in source.files() {
        let processed = is_processed(ctx, pdf);
        if processed && !include_processed {
            hidden += 1;
            continue;
        }
        rows.push(FileRow {
            file: file_name(pdf),
            size: format_bytes(file_size(pdf)),
            status: if processed { "processed" } else { "pending" }.to_string(),
        });
    }

    output::header(&format!("PDF files in {}", dir.display()));
    if rows.is_empty() {
        output::success(&format!(
            "All {hidden} PDF files already have notes (use --processed to list them)"
        ));
        return Ok(());
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    if hidden > 0 {
        output::info(&format!("{hidden} processed files hidden (use --processed)"));
    }
    Ok(())
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn metric(metric: &str, value: impl ToString) -> MetricRow {
    MetricRow {
        metric: metric.to_string(),
        value: value.to_string(),
    }
}

/// Execute status
pub fn status(ctx: &AppContext, directory: Option<PathBuf>) -> Result<()> {
    let dir = target_dir(directory)?;
    let source = PdfSource::from_dir(&dir, DEFAULT_PATTERN)
        .with_context(|| format!("Cannot scan {}", dir.display()))?;

    let (processed, pending): (Vec<&PathBuf>, Vec<&PathBuf>) =
        source.files().iter().partition(|pdf| is_processed(ctx, pdf));
    let total = source.files().len();
    let total_size: u64 = source.files().iter().map(|pdf| file_size(pdf)).sum();
    let completion = if total == 0 {
        0.0
    } else {
        processed.len() as f64 * 100.0 / total as f64
    };

    println!("{}", format!("Status of {}", dir.display()).bold());
    let mut table = Table::new([
        metric("PDF files", total),
        metric("Processed", processed.len()),
        metric("Pending", pending.len()),
        metric("Completion", format!("{completion:.0}%")),
        metric("Total size", format_bytes(total_size)),
    ]);
    table.with(Style::rounded());
    println!("{table}");

    if !pending.is_empty() {
        println!("\n{}", "Pending files:".yellow());
        for pdf in pending.iter().take(PENDING_PREVIEW) {
            println!("  • {}", file_name(pdf));
        }
        if pending.len() > PENDING_PREVIEW {
            println!("  ... and {} more", pending.len() - PENDING_PREVIEW);
        }
    }

    let stages = stage_counts(&dir)?;
    if !stages.is_empty() {
        println!("\n{}", "Review stages:".bold());
        let rows: Vec<MetricRow> = LifecycleStage::ALL
            .iter()
            .filter_map(|stage| stages.get(stage).map(|count| metric(stage.as_token(), count)))
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }
    Ok(())
}

/// Number of generated notes in `dir` per review stage
pub fn stage_counts(dir: &Path) -> Result<HashMap<LifecycleStage, usize>> {
    let mut counts = HashMap::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Cannot read {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") || !path.is_file() {
            continue;
        }
        let bytes = std::fs::read(&path)?;
        match NoteFile::parse(&decode(&bytes).0) {
            Ok(note) => *counts.entry(note.stage()).or_insert(0) += 1,
            Err(err) => debug!("Not counting {}: {}", path.display(), err),
        }
    }
    Ok(counts)
}

/// Files under `dir` matching [`TEMP_PATTERNS`]
pub fn temp_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();
    for pattern in TEMP_PATTERNS {
        let expression = format!("{base}/{pattern}");
        for entry in glob::glob(&expression)
            .with_context(|| format!("Invalid pattern '{expression}'"))?
        {
            let path = entry?;
            if path.is_file() && !files.contains(&path) {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Execute clean
pub fn clean(directory: Option<PathBuf>, dry_run: bool, force: bool) -> Result<()> {
    let dir = target_dir(directory)?;
    let files = temp_files(&dir)?;

    if files.is_empty() {
        output::success("No temporary files to clean");
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} temporary files:", files.len()).yellow()
    );
    for file in &files {
        println!("  • {}", file.display());
    }

    if dry_run {
        output::info("Dry run: nothing was removed");
        return Ok(());
    }

    if !force {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt("Delete these files?")
            .default(false)
            .interact()
            .context("Confirmation needs a terminal; pass --force to skip it")?;
        if !confirmed {
            output::warning("Cancelled");
            return Ok(());
        }
    }

    let mut removed = 0;
    for file in &files {
        match std::fs::remove_file(file) {
            Ok(()) => {
                removed += 1;
                debug!("Removed {}", file.display());
            }
            Err(err) => output::error(&format!("Failed to remove {}: {err}", file.display())),
        }
    }
    output::success(&format!("Removed {removed} temporary files"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn finds_temp_files_including_cache() {
        let dir = TempDir::new().unwrap();
        for name in ["a.tmp", "b.temp", "notes.md~", "keep.md", ".001.md.1234.tmp"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join(".adn_cache")).unwrap();
        std::fs::write(dir.path().join(".adn_cache/entry"), "x").unwrap();

        let names: Vec<String> = temp_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| file_name(p))
            .collect();
        assert_eq!(names.len(), 5);
        assert!(names.contains(&".001.md.1234.tmp".to_string()));
        assert!(names.contains(&"entry".to_string()));
        assert!(!names.contains(&"keep.md".to_string()));
    }

    #[test]
    fn counts_notes_by_stage() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("001.md"), "---\nestado: obtained\n---\n").unwrap();
        std::fs::write(dir.path().join("002.md"), "---\nestado: obtenido-motor\n---\n").unwrap();
        std::fs::write(dir.path().join("003.md"), "---\nestado: in_extraction\n---\n").unwrap();
        std::fs::write(dir.path().join("README.md"), "# not a note\n").unwrap();

        let counts = stage_counts(dir.path()).unwrap();
        assert_eq!(counts.get(&LifecycleStage::Obtained), Some(&2));
        assert_eq!(counts.get(&LifecycleStage::InExtraction), Some(&1));
        assert_eq!(counts.len(), 2);
    }
}
