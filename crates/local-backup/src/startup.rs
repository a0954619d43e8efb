//! Loading the config and starting the logger.
//!

use shared::{LoggerError, init_logger};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    cli::Cli,
    config::{Config, LoadConfigError},
    freshness::Freshness,
};

/// The config file from `--config`, or the defaults.
pub fn load_config(cli: &Cli) -> Result<Config, StartupError> {
    match &cli.config {
        Some(path) => Ok(Config::load_toml(path.clone())?),
        None => Ok(Config::default()),
    }
}

/// Set the global logger for `config`. The guards must be held until the program exits.
pub fn start_logger(config: &Config) -> Result<Vec<WorkerGuard>, StartupError> {
    let level = config.log_level()?;
    Ok(init_logger(config.log_directory.as_deref(), level)?)
}

/// How to leave the program when it could not start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupFailure {
    /// A check still reports its verdict on standard output.
    Check(Freshness),

    /// Any other mode reports the error on standard error.
    Abort(String),
}

impl StartupFailure {
    /// A check turns every start-up error into a critical verdict.
    pub fn new(cli: &Cli, error: &StartupError) -> Self {
        if cli.check {
            Self::Check(Freshness::Failed(error.to_string()))
        } else {
            Self::Abort(error.to_string())
        }
    }

    /// The exit status to leave the program with.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Check(freshness) => freshness.verdict().exit_code(),
            Self::Abort(_) => 1,
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Could not load config: {0}")]
    Config(#[from] LoadConfigError),

    #[error("Could not start logger: {0}")]
    Logger(#[from] LoggerError),
}
