//! Command line arguments
//!

use std::path::PathBuf;

use clap::Parser;

use crate::{
    config::Config,
    invocation::{Invocation, Passphrase},
    operations::Mode,
};

/// Backup locally with duplicity running in a container.
#[derive(Debug, Parser)]
#[command(name = "local-backup", version, about, long_about = None)]
pub struct Cli {
    /// Source directory for backup or restore.
    pub from_directory: PathBuf,

    /// Target directory for backup or restore.
    pub to_directory: PathBuf,

    /// Show only information about the backup. No backup will be done.
    #[arg(long, conflicts_with_all = ["check", "restore"])]
    pub info: bool,

    /// Check the backup age. Exits with 2 for old backups.
    #[arg(long, conflicts_with = "restore")]
    pub check: bool,

    /// Restore the latest backup into the source directory.
    #[arg(long)]
    pub restore: bool,

    /// Backup age considered critical in seconds. (default: two weeks)
    #[arg(long, value_name = "SECONDS", requires = "check")]
    pub critical: Option<u64>,

    /// Remove old backups after the backup, for instance 6M or 2Y. (default: 10Y)
    #[arg(long = "remove_older_than", value_name = "AGE")]
    pub remove_older_than: Option<String>,

    /// Directory for the duplicity cache. (default: /var/lib/backup/)
    #[arg(long = "cache_directory", value_name = "PATH")]
    pub cache_directory: Option<PathBuf>,

    /// Use encryption with this passphrase.
    #[arg(long, env = "BACKUP_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    /// Config file with defaults for the other options.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The operation selected by the flags.
    pub fn mode(&self, config: &Config) -> Mode {
        if self.check {
            Mode::Check {
                critical_seconds: self.critical.unwrap_or(config.critical_seconds),
            }
        } else if self.info {
            Mode::Info
        } else if self.restore {
            Mode::Restore
        } else {
            Mode::Backup {
                full_if_older_than: config.full_if_older_than.clone(),
                remove_older_than: self
                    .remove_older_than
                    .clone()
                    .unwrap_or_else(|| config.remove_older_than.clone()),
            }
        }
    }

    /// The container invocation for the directories and options.
    pub fn invocation(&self, config: &Config, tty: bool) -> Invocation {
        Invocation {
            runtime: config.runtime.clone(),
            image: config.image.clone(),
            cache_directory: self
                .cache_directory
                .clone()
                .unwrap_or_else(|| config.cache_directory.clone()),
            from_directory: self.from_directory.clone(),
            to_directory: self.to_directory.clone(),
            passphrase: self
                .passphrase
                .as_ref()
                .filter(|passphrase| !passphrase.is_empty())
                .map(|passphrase| Passphrase::new(passphrase.as_str())),
            tty,
        }
    }
}
