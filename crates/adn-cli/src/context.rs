//! Per-invocation state shared by the commands

use std::sync::Arc;

use adn_config::{AdnConfig, ConfigManager};
use adn_pipeline::{BatchPipeline, FsOutputWriter, TemplateEngine};
use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::output;

pub struct AppContext {
    pub manager: ConfigManager,
    pub config: AdnConfig,
}

impl AppContext {
    /// Locate and load the configuration.
    ///
    /// A configuration file that cannot be read is reported and replaced by
    /// the defaults, so `config reset` and `config restore` still work.
    pub fn load(cli: &Cli) -> Result<Self> {
        let manager = ConfigManager::discover(cli.config_dir.as_deref())
            .context("Failed to locate the configuration directory")?;
        let config = match manager.load() {
            Ok(config) => config,
            Err(err) => {
                output::warning(&format!(
                    "Ignoring {}: {err}",
                    manager.config_file().display()
                ));
                AdnConfig::default()
            }
        };
        Ok(Self { manager, config })
    }

    /// Writer using the configured encoding
    pub fn writer(&self) -> Result<FsOutputWriter> {
        FsOutputWriter::with_encoding(&self.config.encoding)
            .context("Invalid 'encoding' setting")
    }

    /// Pipeline reading templates from the configured templates directory
    pub fn pipeline(&self) -> Result<BatchPipeline> {
        let templates = self.manager.templates_dir(&self.config);
        Ok(BatchPipeline::new(
            Arc::new(TemplateEngine::new(Some(templates))),
            Arc::new(self.writer()?),
        ))
    }
}
