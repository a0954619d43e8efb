//! Running commands on the host.
//!

use std::io;

use thiserror::Error;

mod mock;
mod process;

pub use mock::MockRunner;
pub use process::ProcessRunner;

use crate::invocation::ContainerCommand;

/// Runs container commands.
pub trait CommandRunner {
    /// Run a command to completion, its output goes straight to the terminal.
    fn run(&mut self, command: &ContainerCommand) -> Result<(), RunError>;

    /// Run a command to completion and return its standard output.
    fn capture(&mut self, command: &ContainerCommand) -> Result<String, RunError>;
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to run command:\n{0}")]
    RunCommand(#[source] io::Error),

    #[error("Command exited with status {code}")]
    Exited { code: i32 },

    #[error("Command exited with status {code}:\n{stderr}")]
    CommandErrored { code: i32, stderr: String },

    #[error("Command was terminated by a signal")]
    Terminated,
}

impl RunError {
    /// The exit status to leave the program with after this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Exited { code } | Self::CommandErrored { code, .. } => {
                u8::try_from(*code).ok().filter(|code| *code != 0).unwrap_or(1)
            }
            Self::RunCommand(_) | Self::Terminated => 1,
        }
    }
}
