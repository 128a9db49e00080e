//! Configuration file management
//!
//! The configuration lives in `config.yaml` inside the configuration
//! directory, which is `$ADN_CONFIG_DIR` when set and `~/.adn` otherwise.
//! The directory also holds the user templates, logs and timestamped backups.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{AdnConfig, ValidationReport};
use crate::error::{ConfigError, ConfigResult};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "ADN_CONFIG_DIR";

const CONFIG_FILE: &str = "config.yaml";
const BACKUP_PREFIX: &str = "config_backup_";

/// Loads and persists [`AdnConfig`]
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Resolve the directory from an explicit override, then
    /// `ADN_CONFIG_DIR`, then `~/.adn`.
    pub fn discover(override_dir: Option<&Path>) -> ConfigResult<Self> {
        if let Some(dir) = override_dir {
            return Ok(Self::new(dir));
        }
        Self::default_config_dir().map(Self::new)
    }

    pub fn default_config_dir() -> ConfigResult<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        dirs::home_dir()
            .map(|home| home.join(".adn"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    /// Directory holding user templates for `config`
    pub fn templates_dir(&self, config: &AdnConfig) -> PathBuf {
        config
            .templates_dir
            .clone()
            .unwrap_or_else(|| self.config_dir.join("templates"))
    }

    pub fn exists(&self) -> bool {
        self.config_file().is_file()
    }

    /// Create the directory layout and write a default configuration.
    pub fn init(&self, force: bool) -> ConfigResult<PathBuf> {
        let path = self.config_file();
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path));
        }

        let config = AdnConfig::default();
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(self.templates_dir(&config))?;
        fs::create_dir_all(self.logs_dir())?;
        self.save(&config)?;

        info!("Configuration initialized at {}", path.display());
        Ok(path)
    }

    /// Load the configuration, falling back to defaults when no file exists.
    pub fn load(&self) -> ConfigResult<AdnConfig> {
        let path = self.config_file();
        if !path.exists() {
            debug!("No configuration at {}, using defaults", path.display());
            return Ok(AdnConfig::default());
        }
        let contents = fs::read_to_string(&path)?;
        parse_config(&contents)
    }

    pub fn save(&self, config: &AdnConfig) -> ConfigResult<()> {
        fs::create_dir_all(&self.config_dir)?;
        let yaml = serde_yaml::to_string(config)?;
        fs::write(self.config_file(), yaml)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> ConfigResult<String> {
        self.load()?.get(key)
    }

    /// Validate and persist a single value.
    pub fn set(&self, key: &str, value: &str) -> ConfigResult<AdnConfig> {
        let mut config = self.load()?;
        config.set(key, value)?;
        self.save(&config)?;
        info!("Configuration updated: {} = {}", key, value);
        Ok(config)
    }

    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&AdnConfig::default())?;
        info!("Configuration reset to defaults");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<ValidationReport> {
        let config = self.load()?;
        Ok(config.validate(&self.templates_dir(&config)))
    }

    /// Copy the current file to `config_backup_<timestamp>.yaml`.
    pub fn backup(&self) -> ConfigResult<PathBuf> {
        let source = self.config_file();
        if !source.exists() {
            return Err(ConfigError::NotFound(source));
        }

        let backup = self.next_backup_path();
        fs::copy(&source, &backup)?;
        info!("Backup created: {}", backup.display());
        Ok(backup)
    }

    /// Replace the configuration with a backup. The current file is backed
    /// up first.
    pub fn restore(&self, backup: &Path) -> ConfigResult<()> {
        if !backup.is_file() {
            return Err(ConfigError::NotFound(backup.to_path_buf()));
        }

        let contents = fs::read_to_string(backup)?;
        parse_config(&contents).map_err(|err| ConfigError::InvalidBackup {
            path: backup.to_path_buf(),
            message: err.to_string(),
        })?;

        if self.exists() {
            self.backup()?;
        }
        fs::create_dir_all(&self.config_dir)?;
        fs::write(self.config_file(), contents)?;

        info!("Configuration restored from {}", backup.display());
        Ok(())
    }

    /// Existing backups, oldest first
    pub fn list_backups(&self) -> ConfigResult<Vec<PathBuf>> {
        if !self.config_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut backups: Vec<PathBuf> = fs::read_dir(&self.config_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(BACKUP_PREFIX) && n.ends_with(".yaml"))
            })
            .collect();
        backups.sort();
        Ok(backups)
    }

    fn next_backup_path(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let mut candidate = self.config_dir.join(format!("{BACKUP_PREFIX}{stamp}.yaml"));
        let mut n = 1;
        while candidate.exists() {
            candidate = self
                .config_dir
                .join(format!("{BACKUP_PREFIX}{stamp}_{n}.yaml"));
            n += 1;
        }
        candidate
    }
}

fn parse_config(contents: &str) -> ConfigResult<AdnConfig> {
    if contents.trim().is_empty() {
        return Ok(AdnConfig::default());
    }
    Ok(serde_yaml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn load_without_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::new(dir.path());
        assert!(!manager.exists());
        assert_eq!(manager.load().unwrap(), AdnConfig::default());
    }

    #[test]
    fn empty_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::new(dir.path());
        fs::write(manager.config_file(), "").unwrap();
        assert_eq!(manager.load().unwrap(), AdnConfig::default());
    }

    #[test]
    #[serial]
    fn env_var_overrides_home() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var(CONFIG_DIR_ENV, dir.path());
        let manager = ConfigManager::discover(None).unwrap();
        std::env::remove_var(CONFIG_DIR_ENV);
        assert_eq!(manager.config_dir(), dir.path());
    }

    #[test]
    #[serial]
    fn explicit_dir_wins_over_env() {
        std::env::set_var(CONFIG_DIR_ENV, "/nonexistent/adn");
        let manager = ConfigManager::discover(Some(Path::new("/tmp/explicit"))).unwrap();
        std::env::remove_var(CONFIG_DIR_ENV);
        assert_eq!(manager.config_dir(), Path::new("/tmp/explicit"));
    }

    #[test]
    fn backup_names_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::new(dir.path());
        manager.init(false).unwrap();

        let first = manager.backup().unwrap();
        let second = manager.backup().unwrap();
        assert_ne!(first, second);
        assert_eq!(manager.list_backups().unwrap().len(), 2);
    }
}
