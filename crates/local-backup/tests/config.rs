//! Tests for loading the config
//!

use std::{fs, path::PathBuf};

use local_backup::config::{Config, LoadConfigError};
use tempfile::TempDir;
use tracing::Level;

#[test]
fn default_round_trips() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("config.toml");

    fs::write(&path, toml::to_string_pretty(&Config::default()).unwrap()).unwrap();

    let config = Config::load_toml(path).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.log_level().unwrap(), Level::INFO);
}

#[test]
fn missing_fields_use_defaults() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("config.toml");
    fs::write(
        &path,
        "image = \"example/duplicity:2\"\nremove_older_than = \"6M\"\nlog_directory = \"/var/log/backup\"\n",
    )
    .unwrap();

    let config = Config::load_toml(path).unwrap();
    assert_eq!(config.image, "example/duplicity:2");
    assert_eq!(config.remove_older_than, "6M");
    assert_eq!(config.log_directory, Some(PathBuf::from("/var/log/backup")));
    assert_eq!(config.runtime, "docker");
    assert_eq!(config.critical_seconds, 14 * 24 * 3600);
}

#[test]
fn missing_file() {
    let directory = TempDir::new().unwrap();

    let result = Config::load_toml(directory.path().join("missing.toml"));
    assert!(matches!(result, Err(LoadConfigError::NoFile(_))), "{result:?}");
}

#[test]
fn invalid_toml() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("config.toml");
    fs::write(&path, "critical_seconds = \"soon\"").unwrap();

    let result = Config::load_toml(path);
    assert!(
        matches!(result, Err(LoadConfigError::Deserialize(_))),
        "{result:?}"
    );
}

#[test]
fn invalid_log_level() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("config.toml");
    fs::write(&path, "log_level = \"chatty\"").unwrap();

    let result = Config::load_toml(path);
    assert!(
        matches!(result, Err(LoadConfigError::InvalidLogLevel(_))),
        "{result:?}"
    );
}
