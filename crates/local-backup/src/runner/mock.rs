use super::{CommandRunner, RunError};
use crate::invocation::ContainerCommand;

/// Records commands instead of running them.
#[derive(Default, Debug, Clone)]
pub struct MockRunner {
    /// Every command that was run or captured, in order.
    pub commands: Vec<ContainerCommand>,

    /// The output returned by `capture`.
    pub output: String,

    /// Fail the command at this index in `commands` with this exit code.
    pub fail_at: Option<(usize, i32)>,
}

impl MockRunner {
    /// A runner whose captured commands print `output`.
    pub fn with_output(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            ..Self::default()
        }
    }

    /// A runner that fails the command at `index` with exit `code`.
    pub fn failing_at(index: usize, code: i32) -> Self {
        Self {
            fail_at: Some((index, code)),
            ..Self::default()
        }
    }

    /// The arguments of every recorded command.
    pub fn args(&self) -> Vec<&[String]> {
        self.commands
            .iter()
            .map(|command| command.args.as_slice())
            .collect()
    }

    fn record(&mut self, command: &ContainerCommand) -> Result<(), RunError> {
        let index = self.commands.len();
        self.commands.push(command.clone());

        match self.fail_at {
            Some((fail_index, code)) if fail_index == index => Err(RunError::Exited { code }),
            _ => Ok(()),
        }
    }
}

impl CommandRunner for MockRunner {
    fn run(&mut self, command: &ContainerCommand) -> Result<(), RunError> {
        self.record(command)
    }

    fn capture(&mut self, command: &ContainerCommand) -> Result<String, RunError> {
        self.record(command)?;
        Ok(self.output.clone())
    }
}
