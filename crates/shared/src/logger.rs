use std::{fs::create_dir_all, io, path::Path};

use thiserror::Error;
use tracing::{
    Level,
    subscriber::{SetGlobalDefaultError, set_global_default},
};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{layer::SubscriberExt, registry};

/// Create and set the global loggers.
///
/// Logs always go to stderr, standard output is left to the program. When a `log_directory` is
/// given, logs are also written to a daily rolling file in that directory.
pub fn init_logger(
    log_directory: Option<&Path>,
    level: Level,
) -> Result<Vec<WorkerGuard>, LoggerError> {
    let filter = tracing_subscriber::filter::Targets::new().with_default(level);
    let mut guards = Vec::with_capacity(2);

    // File layer
    let file_layer = match log_directory {
        Some(log_directory) => {
            create_dir_all(log_directory).map_err(LoggerError::CreateDirectory)?;

            let appender = RollingFileAppender::builder()
                .filename_suffix("log")
                .rotation(Rotation::DAILY)
                .max_log_files(90)
                .build(log_directory)?;

            let (writer, guard) = tracing_appender::non_blocking(appender);
            guards.push(guard);

            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);

            Some(layer)
        }
        None => None,
    };

    // Std layer
    let std_layer = {
        let (writer, guard) = tracing_appender::non_blocking(io::stderr());
        guards.push(guard);

        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(true)
            .with_target(false)
    };

    // Create registry
    let registry = registry().with(file_layer).with(std_layer).with(filter);

    // Set global subscriber
    set_global_default(registry)?;

    Ok(guards)
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to create rolling appender:\n{0}")]
    CreateRollingAppender(#[from] tracing_appender::rolling::InitError),

    #[error("Failed to create log directory:\n{0}")]
    CreateDirectory(#[source] io::Error),

    #[error("Failed to set the global logger:\n{0}")]
    SetGlobalDefault(#[from] SetGlobalDefaultError),
}
