//! Running the selected operation.
//!

use std::path::PathBuf;

use chrono::{DateTime, TimeZone};
use thiserror::Error;
use tracing::info;

use crate::{
    freshness::{Freshness, check_freshness},
    invocation::{ContainerCommand, Invocation, InvocationError},
    runner::{CommandRunner, RunError},
};

/// What to do with the source and target directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Print the collection status.
    Info,

    /// Check that the latest backup is at most `critical_seconds` old.
    Check {
        /// The maximum backup age.
        critical_seconds: u64,
    },

    /// Restore the latest backup into the source directory.
    Restore,

    /// Backup, then remove old backups and clean up.
    Backup {
        /// Start a new full backup once the last is older than this.
        full_if_older_than: String,

        /// Remove backups older than this, nothing is removed if empty.
        remove_older_than: String,
    },
}

/// The result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation finished.
    Completed,

    /// The freshness check finished.
    Checked(Freshness),
}

/// Check that the source and target directories exist and can be mounted.
pub fn preflight(invocation: &Invocation) -> Result<(), PreflightError> {
    for directory in [&invocation.from_directory, &invocation.to_directory] {
        if !directory.exists() {
            return Err(PreflightError::DirectoryNotFound(directory.clone()));
        }
    }

    invocation.validate()?;

    Ok(())
}

/// Run `mode` against the invocation's directories.
///
/// A check never fails, its problems are part of the returned [`Freshness`]. Every other mode
/// stops at the first command that fails.
pub fn execute<R: CommandRunner, Tz: TimeZone>(
    mode: &Mode,
    invocation: &Invocation,
    runner: &mut R,
    now: &DateTime<Tz>,
) -> Result<Outcome, OperationError> {
    match mode {
        Mode::Check { critical_seconds } => {
            let freshness = match preflight(invocation) {
                Ok(()) => check_freshness(runner, invocation, *critical_seconds, now),
                Err(error) => Freshness::Failed(error.to_string()),
            };
            return Ok(Outcome::Checked(freshness));
        }

        Mode::Info => {
            preflight(invocation)?;
            let command = invocation.print_collection_status()?;
            run_step(runner, &command, "print collection status")?;
        }

        Mode::Restore => {
            preflight(invocation)?;
            info!("Restoring from backup");
            let command = invocation.restore()?;
            run_step(runner, &command, "restore")?;
        }

        Mode::Backup {
            full_if_older_than,
            remove_older_than,
        } => {
            preflight(invocation)?;
            info!("Starting backup.");
            let command = invocation.backup(full_if_older_than)?;
            run_step(runner, &command, "backup")?;

            if !remove_older_than.is_empty() {
                info!("Remove old backups.");
                let command = invocation.remove_older_than(remove_older_than)?;
                run_step(runner, &command, "remove old backups")?;
            }

            info!("Cleanup backups.");
            let command = invocation.cleanup()?;
            run_step(runner, &command, "cleanup")?;
        }
    }

    Ok(Outcome::Completed)
}

fn run_step<R: CommandRunner>(
    runner: &mut R,
    command: &ContainerCommand,
    step: &'static str,
) -> Result<(), OperationError> {
    info!("{command}");
    runner
        .run(command)
        .map_err(|source| OperationError::Run { step, source })
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("{0:?} directory not found.")]
    DirectoryNotFound(PathBuf),

    #[error("Invalid directory: {0}")]
    Invocation(#[from] InvocationError),
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Preflight(#[from] PreflightError),

    #[error("Could not build command: {0}")]
    Invocation(#[from] InvocationError),

    #[error("Failed to {step}: {source}")]
    Run {
        step: &'static str,
        #[source]
        source: RunError,
    },
}

impl OperationError {
    /// The exit status to leave the program with. A failed command's own status is kept.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Run { source, .. } => source.exit_code(),
            Self::Preflight(_) | Self::Invocation(_) => 1,
        }
    }
}
