//! Tracing subscriber setup
//!
//! The filter comes from the first of: `--log-level`, `--verbose`/`--quiet`,
//! `RUST_LOG`, the configured `log_level`.

use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, LogLevel};
use adn_config::AdnConfig;

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Off => "off",
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

/// Resolve the filter directive from the command line, environment and
/// configuration.
pub fn filter_directive(
    log_level: Option<LogLevel>,
    verbose: bool,
    quiet: bool,
    rust_log: Option<&str>,
    config_level: &str,
) -> String {
    if let Some(level) = log_level {
        return level_directive(level).to_string();
    }
    if verbose {
        return "debug".to_string();
    }
    if quiet {
        return "warn".to_string();
    }
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(env) => env.to_string(),
        None => config_level.to_string(),
    }
}

/// Install the global subscriber.
pub fn init(cli: &Cli, config: &AdnConfig) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(
        cli.log_level,
        cli.verbose,
        cli.quiet,
        rust_log.as_deref(),
        config.tracing_level(),
    );
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("Invalid log filter '{directive}'"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match &cli.log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| anyhow!("Failed to initialise logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Some(LogLevel::Trace), true, false, Some("error"), "warn" => "trace"; "explicit level wins")]
    #[test_case(None, true, false, Some("error"), "warn" => "debug"; "verbose beats env")]
    #[test_case(None, false, true, Some("debug"), "info" => "warn"; "quiet beats env")]
    #[test_case(None, false, false, Some("adn_pipeline=trace"), "info" => "adn_pipeline=trace"; "env beats config")]
    #[test_case(None, false, false, Some("  "), "error" => "error"; "blank env ignored")]
    #[test_case(None, false, false, None, "info" => "info"; "config fallback")]
    fn directive_precedence(
        level: Option<LogLevel>,
        verbose: bool,
        quiet: bool,
        env: Option<&str>,
        config: &str,
    ) -> String {
        filter_directive(level, verbose, quiet, env, config)
    }
}
