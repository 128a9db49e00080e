//! The ADN configuration model
//!
//! Every field has a default so that a partial (or empty) `config.yaml`
//! loads cleanly. Values are set from the command line as text through
//! [`AdnConfig::set`], which parses and validates them per key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// Name of the built-in template for PDF notes
pub const DEFAULT_TEMPLATE: &str = "default";
/// Name of the built-in template for CSV rows
pub const CSV_TEMPLATE: &str = "csv_record";

/// Log levels accepted in `log_level`
pub const LOG_LEVELS: [&str; 6] = ["TRACE", "DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"];

const MAX_SUFFIX_LEN: usize = 20;
const MAX_TEMPLATE_NAME_LEN: usize = 50;
const FILENAME_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 10..=255;
const INVALID_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// User configuration stored in `config.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdnConfig {
    /// Template used for PDF notes
    pub default_template: String,
    /// Template used for CSV rows
    pub csv_template: String,
    /// Appended to the PDF stem when naming notes
    pub output_suffix: String,
    pub default_output_dir: PathBuf,
    pub log_level: String,
    /// strftime format used for the `date` template variable
    pub date_format: String,
    /// Encoding label for written notes
    pub encoding: String,
    pub max_filename_length: usize,
    pub skip_existing: bool,
    /// Size of the per-record worker pool
    pub workers: usize,
    /// Overrides `<config dir>/templates`
    pub templates_dir: Option<PathBuf>,
}

impl Default for AdnConfig {
    fn default() -> Self {
        Self {
            default_template: DEFAULT_TEMPLATE.to_string(),
            csv_template: CSV_TEMPLATE.to_string(),
            output_suffix: "_extraccion".to_string(),
            default_output_dir: PathBuf::from("."),
            log_level: "INFO".to_string(),
            date_format: "%d/%m/%Y %H:%M".to_string(),
            encoding: "utf-8".to_string(),
            max_filename_length: 100,
            skip_existing: true,
            workers: 1,
            templates_dir: None,
        }
    }
}

/// Errors and warnings found by [`AdnConfig::validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl AdnConfig {
    /// All keys accepted by [`get`](Self::get) and [`set`](Self::set)
    pub const KEYS: [&'static str; 11] = [
        "default_template",
        "csv_template",
        "output_suffix",
        "default_output_dir",
        "log_level",
        "date_format",
        "encoding",
        "max_filename_length",
        "skip_existing",
        "workers",
        "templates_dir",
    ];

    /// Read a value as text.
    pub fn get(&self, key: &str) -> ConfigResult<String> {
        let value = match key {
            "default_template" => self.default_template.clone(),
            "csv_template" => self.csv_template.clone(),
            "output_suffix" => self.output_suffix.clone(),
            "default_output_dir" => self.default_output_dir.display().to_string(),
            "log_level" => self.log_level.clone(),
            "date_format" => self.date_format.clone(),
            "encoding" => self.encoding.clone(),
            "max_filename_length" => self.max_filename_length.to_string(),
            "skip_existing" => self.skip_existing.to_string(),
            "workers" => self.workers.to_string(),
            "templates_dir" => self
                .templates_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Parse, validate and store a value given as text.
    pub fn set(&mut self, key: &str, raw: &str) -> ConfigResult<()> {
        let raw = raw.trim();
        match key {
            "default_template" => {
                validate_template_name(raw).map_err(|m| ConfigError::invalid(key, m))?;
                self.default_template = raw.to_string();
            }
            "csv_template" => {
                validate_template_name(raw).map_err(|m| ConfigError::invalid(key, m))?;
                self.csv_template = raw.to_string();
            }
            "output_suffix" => {
                validate_suffix(raw).map_err(|m| ConfigError::invalid(key, m))?;
                self.output_suffix = raw.to_string();
            }
            "default_output_dir" => {
                let path = PathBuf::from(raw);
                if path.is_absolute() && !path.exists() {
                    return Err(ConfigError::invalid(
                        key,
                        format!("directory does not exist: {}", path.display()),
                    ));
                }
                self.default_output_dir = path;
            }
            "log_level" => {
                let level = normalize_log_level(raw).ok_or_else(|| {
                    ConfigError::invalid(
                        key,
                        format!("expected one of {}", LOG_LEVELS.join(", ")),
                    )
                })?;
                self.log_level = level.to_string();
            }
            "date_format" => {
                validate_date_format(raw).map_err(|m| ConfigError::invalid(key, m))?;
                self.date_format = raw.to_string();
            }
            "encoding" => {
                validate_encoding(raw).map_err(|m| ConfigError::invalid(key, m))?;
                self.encoding = raw.to_ascii_lowercase();
            }
            "max_filename_length" => {
                let value: usize = raw
                    .parse()
                    .map_err(|_| ConfigError::invalid(key, "expected an integer"))?;
                validate_filename_length(value).map_err(|m| ConfigError::invalid(key, m))?;
                self.max_filename_length = value;
            }
            "skip_existing" => {
                self.skip_existing = parse_bool(raw).ok_or_else(|| {
                    ConfigError::invalid(key, "expected true or false")
                })?;
            }
            "workers" => {
                let value: usize = raw
                    .parse()
                    .map_err(|_| ConfigError::invalid(key, "expected a positive integer"))?;
                if value == 0 {
                    return Err(ConfigError::invalid(key, "must be at least 1"));
                }
                self.workers = value;
            }
            "templates_dir" => {
                self.templates_dir = (!raw.is_empty()).then(|| PathBuf::from(raw));
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }

        tracing::debug!(key, value = raw, "Configuration value set");
        Ok(())
    }

    /// Check every value. Errors make the configuration unusable; warnings
    /// point at things that will fall back to a default.
    pub fn validate(&self, templates_dir: &Path) -> ValidationReport {
        let mut report = ValidationReport::default();

        if normalize_log_level(&self.log_level).is_none() {
            report.errors.push(format!(
                "Invalid log_level: {}. Valid values: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }
        if let Err(message) = validate_encoding(&self.encoding) {
            report.errors.push(message);
        }
        if let Err(message) = validate_suffix(&self.output_suffix) {
            report.errors.push(format!("Invalid output_suffix: {message}"));
        }
        if let Err(message) = validate_filename_length(self.max_filename_length) {
            report
                .errors
                .push(format!("Invalid max_filename_length: {message}"));
        }
        if self.workers == 0 {
            report.errors.push("workers must be at least 1".to_string());
        }
        if let Err(message) = validate_date_format(&self.date_format) {
            report.errors.push(format!("Invalid date_format: {message}"));
        }

        for (key, name, builtin) in [
            ("default_template", &self.default_template, DEFAULT_TEMPLATE),
            ("csv_template", &self.csv_template, CSV_TEMPLATE),
        ] {
            if let Err(message) = validate_template_name(name) {
                report.errors.push(format!("Invalid {key}: {message}"));
            } else if name != builtin && !templates_dir.join(format!("{name}.md")).exists() {
                report
                    .warnings
                    .push(format!("Template not found for {key}: {name}"));
            }
        }

        if !self.default_output_dir.exists() {
            report.warnings.push(format!(
                "Output directory does not exist: {}",
                self.default_output_dir.display()
            ));
        }

        report
    }

    /// `log_level` as a tracing filter directive
    pub fn tracing_level(&self) -> &'static str {
        match normalize_log_level(&self.log_level) {
            Some("TRACE") => "trace",
            Some("DEBUG") => "debug",
            Some("WARNING") => "warn",
            Some("ERROR") | Some("CRITICAL") => "error",
            _ => "info",
        }
    }
}

impl fmt::Display for AdnConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in Self::KEYS {
            let value = self.get(key).map_err(|_| fmt::Error)?;
            writeln!(f, "{key}: {value}")?;
        }
        Ok(())
    }
}

fn normalize_log_level(raw: &str) -> Option<&'static str> {
    let upper = raw.trim().to_ascii_uppercase();
    match upper.as_str() {
        "WARN" => Some("WARNING"),
        other => LOG_LEVELS.iter().copied().find(|level| *level == other),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Template names become file names under the templates directory.
pub fn validate_template_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("template name is empty".to_string());
    }
    if name.contains(INVALID_NAME_CHARS) {
        return Err(format!("template name contains invalid characters: {name}"));
    }
    if name.chars().count() > MAX_TEMPLATE_NAME_LEN {
        return Err(format!("template name is too long: {name}"));
    }
    if name.starts_with('.') || name.ends_with('.') {
        return Err(format!(
            "template name cannot start or end with a dot: {name}"
        ));
    }
    Ok(())
}

fn validate_suffix(suffix: &str) -> Result<(), String> {
    if suffix.chars().count() > MAX_SUFFIX_LEN {
        return Err(format!("longer than {MAX_SUFFIX_LEN} characters"));
    }
    if suffix.contains(INVALID_NAME_CHARS) {
        return Err("contains characters not allowed in file names".to_string());
    }
    Ok(())
}

fn validate_encoding(label: &str) -> Result<(), String> {
    match encoding_rs::Encoding::for_label(label.trim().as_bytes()) {
        Some(encoding) if encoding.output_encoding() == encoding => Ok(()),
        Some(encoding) => Err(format!("Cannot write notes as {}", encoding.name())),
        None => Err(format!("Invalid encoding: {label}")),
    }
}

fn validate_filename_length(value: usize) -> Result<(), String> {
    if FILENAME_LENGTH_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "must be between {} and {}, got {value}",
            FILENAME_LENGTH_RANGE.start(),
            FILENAME_LENGTH_RANGE.end()
        ))
    }
}

fn validate_date_format(format: &str) -> Result<(), String> {
    use chrono::format::{Item, StrftimeItems};

    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        Err(format!("not a valid strftime format: {format}"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn defaults_match_documented_values() {
        let config = AdnConfig::default();
        assert_eq!(config.get("default_template").unwrap(), "default");
        assert_eq!(config.get("output_suffix").unwrap(), "_extraccion");
        assert_eq!(config.get("max_filename_length").unwrap(), "100");
        assert_eq!(config.get("skip_existing").unwrap(), "true");
        assert_eq!(config.get("workers").unwrap(), "1");
        assert_eq!(config.get("templates_dir").unwrap(), "");
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: AdnConfig = serde_yaml::from_str("workers: 4\nlog_level: DEBUG\n").unwrap();
        assert_eq!(config.workers, 4);
        assert_eq!(config.tracing_level(), "debug");
        assert_eq!(config.csv_template, CSV_TEMPLATE);
    }

    #[test_case("log_level", "warn", "WARNING")]
    #[test_case("encoding", "Latin1", "latin1")]
    #[test_case("skip_existing", "no", "false")]
    #[test_case("max_filename_length", "255", "255")]
    #[test_case("templates_dir", "/srv/templates", "/srv/templates")]
    fn set_normalizes(key: &str, raw: &str, stored: &str) {
        let mut config = AdnConfig::default();
        config.set(key, raw).unwrap();
        assert_eq!(config.get(key).unwrap(), stored);
    }

    #[test_case("log_level", "LOUD")]
    #[test_case("encoding", "klingon-8")]
    #[test_case("encoding", "utf-16le")]
    #[test_case("max_filename_length", "9")]
    #[test_case("max_filename_length", "256")]
    #[test_case("workers", "0")]
    #[test_case("output_suffix", "_a_suffix_that_is_far_too_long")]
    #[test_case("default_template", ".hidden")]
    #[test_case("csv_template", "a/b")]
    #[test_case("skip_existing", "maybe")]
    fn set_rejects_invalid_values(key: &str, raw: &str) {
        let mut config = AdnConfig::default();
        let err = config.set(key, raw).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }), "{err}");
        assert_eq!(config, AdnConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut config = AdnConfig::default();
        assert!(matches!(
            config.set("colour", "blue"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(config.get("colour"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn validate_reports_errors_and_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AdnConfig {
            log_level: "chatty".to_string(),
            max_filename_length: 5,
            default_template: "custom".to_string(),
            default_output_dir: dir.path().join("missing"),
            ..AdnConfig::default()
        };

        let report = config.validate(dir.path());
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.warnings.len(), 2);

        std::fs::write(dir.path().join("custom.md"), "{{ title }}").unwrap();
        config.log_level = "INFO".to_string();
        config.max_filename_length = 100;
        config.default_output_dir = dir.path().to_path_buf();
        let report = config.validate(dir.path());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn display_lists_every_key() {
        let rendered = AdnConfig::default().to_string();
        for key in AdnConfig::KEYS {
            assert!(rendered.contains(&format!("{key}: ")), "missing {key}");
        }
    }
}
