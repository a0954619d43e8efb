//! Building the container command lines that run duplicity.
//!

use core::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The environment variable duplicity reads the passphrase from.
pub const PASSPHRASE_VARIABLE: &str = "PASSPHRASE";

/// Where the source directory is mounted inside the container.
pub const CONTAINER_SOURCE: &str = "/from_directory";

/// Where the target directory is mounted inside the container.
pub const CONTAINER_TARGET: &str = "/to_directory";

/// The duplicity URL of the target directory inside the container.
pub const TARGET_URL: &str = "file:///to_directory";

const CONTAINER_CACHE: &str = "/home/duplicity/.cache/duplicity";
const CONTAINER_GNUPG: &str = "/home/duplicity/.gnupg";

/// An encryption passphrase. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Passphrase(String);

impl Passphrase {
    /// Wrap a passphrase.
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self(passphrase.into())
    }

    /// The passphrase itself.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}

/// A command to run on the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerCommand {
    /// The program to run.
    pub program: String,

    /// The program's arguments.
    pub args: Vec<String>,

    /// Environment variables set for the program only.
    pub env: Vec<(String, Passphrase)>,
}

impl fmt::Display for ContainerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Everything needed to run duplicity in a container against one source and target.
#[derive(Clone, Debug)]
pub struct Invocation {
    /// The container runtime, e.g. `docker`.
    pub runtime: String,

    /// The duplicity image.
    pub image: String,

    /// Host directory for the duplicity cache and keys.
    pub cache_directory: PathBuf,

    /// Host directory that is backed up, or restored into.
    pub from_directory: PathBuf,

    /// Host directory the backups are stored in.
    pub to_directory: PathBuf,

    /// Encrypt with this passphrase, no encryption if `None`.
    pub passphrase: Option<Passphrase>,

    /// Whether a pseudo-TTY should be allocated for commands whose output is not captured.
    pub tty: bool,
}

impl Invocation {
    /// Check that every host path can be passed on a command line.
    pub fn validate(&self) -> Result<(), InvocationError> {
        for path in [
            &self.cache_directory,
            &self.from_directory,
            &self.to_directory,
        ] {
            path_str(path)?;
            if path.as_os_str().is_empty() {
                return Err(InvocationError::EmptyPath);
            }
        }

        Ok(())
    }

    /// `collection-status` for the target, run without a TTY so the output can be captured.
    pub fn collection_status(&self) -> Result<ContainerCommand, InvocationError> {
        self.command(
            Mount::ReadOnly,
            false,
            &["collection-status", TARGET_URL],
        )
    }

    /// `collection-status` for the target, printed straight to the terminal.
    pub fn print_collection_status(&self) -> Result<ContainerCommand, InvocationError> {
        self.command(
            Mount::ReadOnly,
            self.tty,
            &["collection-status", TARGET_URL],
        )
    }

    /// Restore the latest backup from the target into the source directory.
    pub fn restore(&self) -> Result<ContainerCommand, InvocationError> {
        self.command(
            Mount::ReadWrite,
            self.tty,
            &[
                "restore",
                "--allow-source-mismatch",
                TARGET_URL,
                CONTAINER_SOURCE,
            ],
        )
    }

    /// Backup the source directory, starting a new full backup once the last is older than
    /// `full_if_older_than`.
    pub fn backup(&self, full_if_older_than: &str) -> Result<ContainerCommand, InvocationError> {
        let full_if_older_than = format!("--full-if-older-than={full_if_older_than}");

        self.command(
            Mount::ReadOnly,
            self.tty,
            &[
                full_if_older_than.as_str(),
                "--allow-source-mismatch",
                CONTAINER_SOURCE,
                TARGET_URL,
            ],
        )
    }

    /// Delete backup sets older than `age`, e.g. `6M` or `10Y`.
    pub fn remove_older_than(&self, age: &str) -> Result<ContainerCommand, InvocationError> {
        self.command(
            Mount::ReadOnly,
            self.tty,
            &["remove-older-than", age, "--force", TARGET_URL],
        )
    }

    /// Delete leftovers of failed backups from the target.
    pub fn cleanup(&self) -> Result<ContainerCommand, InvocationError> {
        self.command(
            Mount::ReadOnly,
            self.tty,
            &["cleanup", "--force", TARGET_URL],
        )
    }

    /// The container command up to and including `duplicity`, as used for a backup.
    pub fn prefix(&self) -> Result<ContainerCommand, InvocationError> {
        self.container_prefix(Mount::ReadOnly, self.tty)
    }

    /// The container prefix, `duplicity_args` and the encryption flag.
    fn command(
        &self,
        source_mount: Mount,
        tty: bool,
        duplicity_args: &[&str],
    ) -> Result<ContainerCommand, InvocationError> {
        let mut command = self.container_prefix(source_mount, tty)?;

        command
            .args
            .extend(duplicity_args.iter().map(|arg| (*arg).to_string()));

        if self.passphrase.is_none() {
            command.args.push("--no-encryption".into());
        }

        Ok(command)
    }

    fn container_prefix(
        &self,
        source_mount: Mount,
        tty: bool,
    ) -> Result<ContainerCommand, InvocationError> {
        let cache_directory = path_str(&self.cache_directory)?;
        let from_directory = path_str(&self.from_directory)?;
        let to_directory = path_str(&self.to_directory)?;

        let mut args: Vec<String> = vec!["run".into(), "--rm".into()];
        args.push(if tty { "-it" } else { "-i" }.into());
        args.extend(["--user".into(), "root".into()]);

        let mut env = Vec::new();
        if let Some(passphrase) = &self.passphrase {
            // Only the name is passed, the runtime reads the value from its own environment.
            args.extend(["-e".into(), PASSPHRASE_VARIABLE.into()]);
            env.push((PASSPHRASE_VARIABLE.to_string(), passphrase.clone()));
        }

        let source_mode = match source_mount {
            Mount::ReadOnly => ":ro",
            Mount::ReadWrite => "",
        };

        args.extend([
            "-v".into(),
            format!("{}:{CONTAINER_CACHE}", join(cache_directory, ".cache")),
            "-v".into(),
            format!("{}:{CONTAINER_GNUPG}", join(cache_directory, ".gnupg")),
            "-v".into(),
            format!("{from_directory}:{CONTAINER_SOURCE}{source_mode}"),
            "-v".into(),
            format!("{to_directory}:{CONTAINER_TARGET}"),
            self.image.clone(),
            "duplicity".into(),
        ]);

        Ok(ContainerCommand {
            program: self.runtime.clone(),
            args,
            env,
        })
    }
}

#[derive(Clone, Copy)]
enum Mount {
    ReadOnly,
    ReadWrite,
}

fn path_str(path: &Path) -> Result<&str, InvocationError> {
    path.to_str()
        .ok_or_else(|| InvocationError::NotUnicode(path.to_path_buf()))
}

fn join(directory: &str, name: &str) -> String {
    format!("{}/{name}", directory.trim_end_matches('/'))
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("Path is not valid unicode: {0:?}")]
    NotUnicode(PathBuf),

    #[error("Path is empty")]
    EmptyPath,
}
