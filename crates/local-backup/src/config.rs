//! Local backup config
//!

use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

use crate::freshness::DEFAULT_CRITICAL_SECONDS;

/// Defaults for everything the command line does not set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The container runtime to run duplicity with.
    pub runtime: String,

    /// The duplicity image.
    pub image: String,

    /// Host directory for the duplicity cache and keys.
    pub cache_directory: PathBuf,

    /// Start a new full backup once the last one is older than this, e.g. `6M`.
    pub full_if_older_than: String,

    /// Remove backups older than this after each backup. Empty to keep everything.
    pub remove_older_than: String,

    /// Backup age in seconds that `--check` reports as critical.
    pub critical_seconds: u64,

    /// Also write logs to daily files in this directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_directory: Option<PathBuf>,

    /// The most verbose level to log, e.g. `info` or `debug`.
    pub log_level: String,
}

impl Config {
    /// Tries to load a config from a toml file.
    pub fn load_toml(file_path: PathBuf) -> Result<Self, LoadConfigError> {
        if !file_path.exists() {
            return Err(LoadConfigError::NoFile(file_path));
        }

        let contents = fs::read_to_string(file_path).map_err(LoadConfigError::Read)?;
        let config: Self = toml::from_str(&contents)?;

        config.log_level()?;

        Ok(config)
    }

    /// The parsed log level.
    pub fn log_level(&self) -> Result<Level, LoadConfigError> {
        self.log_level
            .parse()
            .map_err(|_| LoadConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime: "docker".into(),
            image: "wernight/duplicity".into(),
            cache_directory: PathBuf::from("/var/lib/backup/"),
            full_if_older_than: "6M".into(),
            remove_older_than: "10Y".into(),
            critical_seconds: DEFAULT_CRITICAL_SECONDS,
            log_directory: None,
            log_level: "info".into(),
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("The file {0:?} does not exist.")]
    NoFile(PathBuf),

    #[error("Failed to read the file:\n{0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to deserialize the file:\n{0}")]
    Deserialize(#[from] toml::de::Error),

    #[error("Invalid log level '{0}'")]
    InvalidLogLevel(String),
}
