use std::process::{Command, Stdio};

use tracing::debug;

use super::{CommandRunner, RunError};
use crate::invocation::ContainerCommand;

/// Runs commands as child processes and waits for them.
#[derive(Default, Debug, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    fn command(command: &ContainerCommand) -> Command {
        let mut process = Command::new(&command.program);
        process.args(&command.args);
        for (name, value) in &command.env {
            process.env(name, value.expose());
        }
        process
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&mut self, command: &ContainerCommand) -> Result<(), RunError> {
        debug!("Running: {command}");

        let status = Self::command(command)
            .status()
            .map_err(RunError::RunCommand)?;

        if status.success() {
            return Ok(());
        }

        match status.code() {
            Some(code) => Err(RunError::Exited { code }),
            None => Err(RunError::Terminated),
        }
    }

    fn capture(&mut self, command: &ContainerCommand) -> Result<String, RunError> {
        debug!("Capturing: {command}");

        let output = Self::command(command)
            .stdin(Stdio::null())
            .output()
            .map_err(RunError::RunCommand)?;

        if !output.status.success() {
            let Some(code) = output.status.code() else {
                return Err(RunError::Terminated);
            };
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RunError::CommandErrored { code, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
