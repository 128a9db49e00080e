//! Console output helpers shared by the commands
//!
//! Status lines go to stdout, warnings and errors to stderr. `--quiet`
//! silences the informational lines only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use adn_pipeline::{ProcessingReport, RecordReport};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn info(message: &str) {
    if !is_quiet() {
        println!("{} {}", "ℹ".blue(), message);
    }
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

pub fn header(title: &str) {
    if !is_quiet() {
        println!("{}", title.bold());
    }
}

/// Format a duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.as_millis();

    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{millis}ms")
    }
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "Record")]
    record: String,
    #[tabled(rename = "Error")]
    error: String,
}

fn failure_row(report: &RecordReport) -> Option<FailureRow> {
    report.outcome.error().map(|err| FailureRow {
        record: report.label.clone(),
        error: err.to_string(),
    })
}

/// Print batch totals and a table of failed records.
pub fn print_report(report: &ProcessingReport) {
    if !is_quiet() {
        for path in report.created_paths() {
            println!("  {} {}", "+".green(), path.display());
        }
    }

    println!(
        "\n{} {} created, {} skipped, {} failed ({} records in {})",
        "Summary:".bold(),
        report.created().to_string().green(),
        report.skipped().to_string().yellow(),
        report.failed().to_string().red(),
        report.total(),
        format_duration(report.elapsed)
    );

    let failures: Vec<FailureRow> = report.records.iter().filter_map(failure_row).collect();
    if !failures.is_empty() {
        let mut table = Table::new(failures);
        table.with(Style::rounded());
        eprintln!("{table}");
    }
}
