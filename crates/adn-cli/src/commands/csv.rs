use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use adn_pipeline::{CsvSource, OutputLayout, RecordSource, REQUIRED_COLUMNS};

use crate::cli::{BatchArgs, CsvCommands};
use crate::commands::batch;
use crate::context::AppContext;
use crate::output;

/// Execute csv-to-md subcommand
pub async fn execute(ctx: &AppContext, cmd: CsvCommands) -> Result<()> {
    match cmd {
        CsvCommands::Convert {
            csv,
            output,
            start,
            batch,
        } => convert(ctx, csv, output, start, &batch).await,
        CsvCommands::Validate { csv } => validate(&csv),
    }
}

async fn convert(
    ctx: &AppContext,
    csv: PathBuf,
    output: Option<PathBuf>,
    start_number: usize,
    args: &BatchArgs,
) -> Result<()> {
    let layout = OutputLayout::Numbered {
        dir: output.unwrap_or_else(|| ctx.config.default_output_dir.clone()),
        start_number,
    };
    let config = batch::batch_config(ctx, layout, args, &ctx.config.csv_template);
    let source = CsvSource::new(&csv);

    batch::run(ctx, &source, config)
        .await
        .with_context(|| format!("Failed to convert {}", csv.display()))
}

#[derive(Tabled)]
struct RowIssue {
    #[tabled(rename = "Row")]
    row: String,
    #[tabled(rename = "Issue")]
    issue: String,
}

fn validate(csv: &Path) -> Result<()> {
    let source = CsvSource::new(csv);
    source
        .validate()
        .with_context(|| format!("Invalid CSV file {}", csv.display()))?;
    let columns = source.columns()?;

    let mut rows = 0;
    let mut issues = Vec::new();
    for item in source.records()? {
        rows += 1;
        match item {
            Ok(record) => {
                let empty: Vec<&str> = REQUIRED_COLUMNS
                    .iter()
                    .copied()
                    .filter(|column| record.field(column).is_empty())
                    .collect();
                if !empty.is_empty() {
                    issues.push(RowIssue {
                        row: record.label,
                        issue: format!("empty: {}", empty.join(", ")),
                    });
                }
            }
            Err(failure) => issues.push(RowIssue {
                row: failure.label,
                issue: failure.reason,
            }),
        }
    }

    output::success(&format!(
        "{} is valid: {} records, {} columns",
        csv.display(),
        rows,
        columns.len()
    ));
    let extra: Vec<&str> = columns
        .iter()
        .map(String::as_str)
        .filter(|c| !REQUIRED_COLUMNS.iter().any(|required| required == c))
        .collect();
    if !extra.is_empty() {
        output::info(&format!("Ignored columns: {}", extra.join(", ")));
    }

    if !issues.is_empty() {
        output::warning(&format!("{} rows need attention", issues.len()));
        let mut table = Table::new(issues);
        table.with(Style::rounded());
        println!("{}", table.to_string().dimmed());
    }
    Ok(())
}
