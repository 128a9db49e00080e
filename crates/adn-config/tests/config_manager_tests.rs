//! Configuration lifecycle against a real directory

use adn_config::{AdnConfig, ConfigError, ConfigManager};
use std::fs;
use tempfile::TempDir;

fn manager() -> (TempDir, ConfigManager) {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::new(dir.path().join("adn"));
    (dir, manager)
}

#[test]
fn init_creates_layout_and_refuses_to_overwrite() {
    let (_dir, manager) = manager();

    let path = manager.init(false).unwrap();
    assert!(path.is_file());
    assert!(manager.config_dir().join("templates").is_dir());
    assert!(manager.logs_dir().is_dir());

    let err = manager.init(false).unwrap_err();
    assert!(matches!(err, ConfigError::AlreadyExists(_)));

    manager.set("workers", "3").unwrap();
    manager.init(true).unwrap();
    assert_eq!(manager.get("workers").unwrap(), "1");
}

#[test]
fn set_persists_and_reset_restores_defaults() {
    let (_dir, manager) = manager();

    manager.set("output_suffix", "_notes").unwrap();
    manager.set("workers", "4").unwrap();
    assert_eq!(manager.get("output_suffix").unwrap(), "_notes");

    let text = fs::read_to_string(manager.config_file()).unwrap();
    assert!(text.contains("output_suffix: _notes"));
    assert!(text.contains("workers: 4"));

    manager.reset().unwrap();
    assert_eq!(manager.load().unwrap(), AdnConfig::default());
}

#[test]
fn invalid_set_leaves_file_untouched() {
    let (_dir, manager) = manager();
    manager.init(false).unwrap();
    let before = fs::read_to_string(manager.config_file()).unwrap();

    assert!(manager.set("max_filename_length", "1000").is_err());
    assert_eq!(fs::read_to_string(manager.config_file()).unwrap(), before);
}

#[test]
fn validate_flags_hand_edited_values() {
    let (_dir, manager) = manager();
    manager.init(false).unwrap();
    fs::write(
        manager.config_file(),
        "log_level: LOUD\nencoding: not-an-encoding\nworkers: 0\n",
    )
    .unwrap();

    let report = manager.validate().unwrap();
    assert!(!report.is_valid());
    assert_eq!(report.errors.len(), 3, "{:?}", report.errors);
}

#[test]
fn backup_and_restore() {
    let (_dir, manager) = manager();
    manager.init(false).unwrap();
    manager.set("workers", "2").unwrap();

    let backup = manager.backup().unwrap();
    let name = backup.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("config_backup_") && name.ends_with(".yaml"));

    manager.set("workers", "8").unwrap();
    manager.restore(&backup).unwrap();
    assert_eq!(manager.get("workers").unwrap(), "2");

    // Restoring backs up the replaced configuration first
    assert_eq!(manager.list_backups().unwrap().len(), 2);
}

#[test]
fn restore_rejects_missing_and_malformed_backups() {
    let (dir, manager) = manager();
    manager.init(false).unwrap();

    let missing = dir.path().join("nope.yaml");
    assert!(matches!(
        manager.restore(&missing),
        Err(ConfigError::NotFound(_))
    ));

    let broken = dir.path().join("broken.yaml");
    fs::write(&broken, "workers: [not, a, number]\n").unwrap();
    assert!(matches!(
        manager.restore(&broken),
        Err(ConfigError::InvalidBackup { .. })
    ));
    assert_eq!(manager.get("workers").unwrap(), "1");
}

#[test]
fn backup_without_config_fails() {
    let (_dir, manager) = manager();
    assert!(matches!(manager.backup(), Err(ConfigError::NotFound(_))));
}
