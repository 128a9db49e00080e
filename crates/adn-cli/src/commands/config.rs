use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;

use adn_config::ConfigError;

use crate::cli::{ConfigCommands, ShowFormat};
use crate::context::AppContext;
use crate::output;

/// Execute config subcommand
pub fn execute(ctx: &AppContext, cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => init(ctx, force),
        ConfigCommands::Show { format } => show(ctx, format),
        ConfigCommands::Get { key } => {
            println!("{}", ctx.config.get(&key)?);
            Ok(())
        }
        ConfigCommands::Set { key, value } => set(ctx, &key, &value),
        ConfigCommands::Reset => {
            ctx.manager.reset().context("Failed to reset configuration")?;
            output::success("Configuration reset to defaults");
            Ok(())
        }
        ConfigCommands::Validate => validate(ctx),
        ConfigCommands::Backup { list } => backup(ctx, list),
        ConfigCommands::Restore { file } => restore(ctx, &file),
        ConfigCommands::Path => {
            println!("{}", ctx.manager.config_file().display());
            Ok(())
        }
    }
}

/// Initialize the configuration directory
fn init(ctx: &AppContext, force: bool) -> Result<()> {
    match ctx.manager.init(force) {
        Ok(path) => {
            println!(
                "{} Created config file at: {}",
                "Success:".green().bold(),
                path.display()
            );
            println!(
                "{}",
                format!(
                    "Templates placed in {} override the built-in ones.",
                    ctx.manager.templates_dir(&ctx.config).display()
                )
                .dimmed()
            );
            Ok(())
        }
        Err(ConfigError::AlreadyExists(path)) => {
            println!(
                "{} Config file already exists at: {}",
                "Error:".red().bold(),
                path.display()
            );
            println!("Use {} to overwrite", "--force".yellow());
            Ok(())
        }
        Err(err) => Err(err).context("Failed to initialize configuration"),
    }
}

/// Show the current effective configuration
fn show(ctx: &AppContext, format: ShowFormat) -> Result<()> {
    if !ctx.manager.exists() {
        eprintln!(
            "{}",
            format!(
                "No config file at {}, showing defaults",
                ctx.manager.config_file().display()
            )
            .dimmed()
        );
    }

    match format {
        ShowFormat::Yaml => print!("{}", serde_yaml::to_string(&ctx.config)?),
        ShowFormat::Json => println!("{}", serde_json::to_string_pretty(&ctx.config)?),
    }
    Ok(())
}

fn set(ctx: &AppContext, key: &str, value: &str) -> Result<()> {
    let config = ctx.manager.set(key, value)?;
    output::success(&format!("{key} = {}", config.get(key)?));
    Ok(())
}

fn validate(ctx: &AppContext) -> Result<()> {
    let report = ctx.manager.validate()?;

    for warning in &report.warnings {
        output::warning(warning);
    }
    for error in &report.errors {
        output::error(error);
    }

    if !report.is_valid() {
        bail!("Configuration has {} error(s)", report.errors.len());
    }
    output::success("Configuration is valid");
    Ok(())
}

fn backup(ctx: &AppContext, list: bool) -> Result<()> {
    if list {
        let backups = ctx.manager.list_backups()?;
        if backups.is_empty() {
            output::info("No backups found");
        }
        for backup in backups {
            println!("{}", backup.display());
        }
        return Ok(());
    }

    let path = ctx.manager.backup().context("Failed to back up configuration")?;
    output::success(&format!("Backup created: {}", path.display()));
    Ok(())
}

fn restore(ctx: &AppContext, file: &Path) -> Result<()> {
    ctx.manager
        .restore(file)
        .with_context(|| format!("Failed to restore {}", file.display()))?;
    output::success(&format!("Configuration restored from {}", file.display()));
    Ok(())
}
