use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use adn_cli::{
    cli::{Cli, Commands},
    commands,
    context::AppContext,
    logging, output,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    output::set_quiet(cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext::load(&cli)?;
    logging::init(&cli, &ctx.config)?;
    debug!("Using configuration at {}", ctx.manager.config_file().display());

    match cli.command {
        Commands::GenMdFromPdf(args) => commands::pdf::execute(&ctx, args).await,
        Commands::CsvToMd(cmd) => commands::csv::execute(&ctx, cmd).await,
        Commands::Config(cmd) => commands::config::execute(&ctx, cmd),
        Commands::ListFiles {
            directory,
            pattern,
            processed,
        } => commands::files::list(&ctx, directory, &pattern, processed),
        Commands::Status { directory } => commands::files::status(&ctx, directory),
        Commands::Clean {
            directory,
            dry_run,
            force,
        } => commands::files::clean(directory, dry_run, force),
        Commands::Review(cmd) => commands::review::execute(&ctx, cmd).await,
    }
}
