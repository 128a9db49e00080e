//! # ADN Configuration
//!
//! User configuration for the `adn` tool: the [`AdnConfig`] model with its
//! per-key validation, and [`ConfigManager`], which stores it as YAML in the
//! configuration directory and handles backups.
//!
//! ```rust,no_run
//! use adn_config::ConfigManager;
//!
//! # fn main() -> adn_config::ConfigResult<()> {
//! let manager = ConfigManager::discover(None)?;
//! let config = manager.load()?;
//! println!("workers: {}", config.workers);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod manager;

pub use config::{
    validate_template_name, AdnConfig, ValidationReport, CSV_TEMPLATE, DEFAULT_TEMPLATE,
    LOG_LEVELS,
};
pub use error::{ConfigError, ConfigResult};
pub use manager::{ConfigManager, CONFIG_DIR_ENV};
