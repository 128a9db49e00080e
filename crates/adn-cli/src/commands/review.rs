use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use adn_core::{Document, DocumentId, NoteFile, ReviewAction};
use adn_pipeline::{csv_source::decode, OutputWriter};

use crate::cli::ReviewCommands;
use crate::context::AppContext;
use crate::presenter;

/// Execute review subcommand
pub async fn execute(ctx: &AppContext, cmd: ReviewCommands) -> Result<()> {
    match cmd {
        ReviewCommands::Show { note, json } => {
            let (_, document) = load(&note)?;
            presenter::terminal_bus(json).publish(document.view());
            Ok(())
        }
        ReviewCommands::Set {
            note,
            first,
            second,
        } => {
            let mut actions = Vec::new();
            if let Some(decision) = first {
                actions.push(ReviewAction::SetFirst(decision.into()));
            }
            if let Some(decision) = second {
                actions.push(ReviewAction::SetSecond(decision.into()));
            }
            if actions.is_empty() {
                bail!("Nothing to record: pass --first and/or --second");
            }
            update(ctx, &note, &actions).await
        }
        ReviewCommands::Extract { note } => {
            update(ctx, &note, &[ReviewAction::BeginExtraction]).await
        }
        ReviewCommands::Back { note } => {
            update(ctx, &note, &[ReviewAction::ReturnToPrevious]).await
        }
    }
}

fn load(path: &Path) -> Result<(NoteFile, Document)> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let (text, _) = decode(&bytes);
    let note = NoteFile::parse(&text)
        .with_context(|| format!("{} is not a generated note", path.display()))?;
    let document = note
        .to_document(DocumentId::Path(path.to_path_buf()))
        .with_output_path(path);
    Ok((note, document))
}

/// Apply `actions` in order and rewrite the note. Nothing is written unless
/// every action is accepted.
async fn update(ctx: &AppContext, path: &Path, actions: &[ReviewAction]) -> Result<()> {
    let (mut note, mut document) = load(path)?;
    let before = document.stage();

    for action in actions {
        document
            .apply(*action)
            .with_context(|| format!("Cannot {} on {}", action.name(), path.display()))?;
    }

    note.apply_document(&document);
    let text = note.render()?;
    ctx.writer()?
        .write(path, &text)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        "{}: {} -> {}",
        path.display(),
        before,
        document.stage()
    );
    presenter::terminal_bus(false).publish(document.view());
    Ok(())
}
