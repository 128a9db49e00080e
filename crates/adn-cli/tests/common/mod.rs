//! Shared fixtures for CLI tests

#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CSV_HEADER: &str = "source,doi,title,abstract\n";

/// Temporary working directory with its own configuration directory
pub struct TestWorkspace {
    pub temp_dir: TempDir,
    pub config_dir: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let config_dir = temp_dir.path().join("config");
        Ok(Self {
            temp_dir,
            config_dir,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// `adn` running inside the workspace with an isolated configuration
    pub fn adn(&self) -> Command {
        let mut cmd = Command::cargo_bin("adn").unwrap();
        cmd.current_dir(self.path())
            .env("ADN_CONFIG_DIR", &self.config_dir)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// CSV with the required header followed by `rows`
    pub fn write_csv(&self, relative: &str, rows: &[&str]) -> Result<PathBuf> {
        let mut content = CSV_HEADER.to_string();
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        self.write(relative, &content)
    }

    /// Minimal file with a PDF header
    pub fn write_pdf(&self, relative: &str) -> Result<PathBuf> {
        self.write(relative, "%PDF-1.4\n%fixture\n")
    }

    pub fn read(&self, relative: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.path().join(relative))?)
    }
}
