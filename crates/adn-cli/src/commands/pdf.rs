use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use adn_pipeline::{OutputLayout, PdfSource};

use crate::cli::PdfArgs;
use crate::commands::batch;
use crate::context::AppContext;
use crate::output;

/// Execute gen-md-from-pdf
pub async fn execute(ctx: &AppContext, args: PdfArgs) -> Result<()> {
    let source = select_source(&args)?;
    if source.is_empty() {
        output::warning("No PDF files found");
        return Ok(());
    }

    let layout = OutputLayout::SourceStem {
        dir: args.output.clone(),
        suffix: ctx.config.output_suffix.clone(),
        max_filename_length: ctx.config.max_filename_length,
    };
    let config = batch::batch_config(ctx, layout, &args.batch, &ctx.config.default_template);

    batch::run(ctx, &source, config).await
}

fn select_source(args: &PdfArgs) -> Result<PdfSource> {
    if let Some(expression) = &args.glob {
        return PdfSource::from_glob(expression)
            .with_context(|| format!("Invalid glob expression '{expression}'"));
    }

    if args.all {
        let dir = args.dir.clone().unwrap_or_else(|| PathBuf::from("."));
        return PdfSource::from_dir(&dir, &args.pattern)
            .with_context(|| format!("Cannot scan {}", dir.display()));
    }

    if args.files.is_empty() {
        bail!("No input: pass PDF files, --all or --glob");
    }
    Ok(PdfSource::from_files(args.files.clone()))
}
