use std::process::{Command, Output};

use crate::error::AppError;

/// Exit status and captured output of one external program run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Converts a non-zero exit into [`AppError::CommandFailed`]
    pub fn check(self, program: &str) -> Result<Self, AppError> {
        if self.success() {
            return Ok(self);
        }
        let detail = match (self.stderr.trim(), self.code) {
            (stderr, _) if !stderr.is_empty() => stderr.to_string(),
            (_, Some(code)) => format!("exit status {code}"),
            (_, None) => "terminated by signal".to_string(),
        };
        Err(AppError::CommandFailed {
            program: program.to_string(),
            detail,
        })
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Runs external programs. Implemented by [`SystemRunner`] for real use and by
/// scripted fakes in tests.
pub trait CommandRunner {
    /// Runs `program` with `args` to completion.
    ///
    /// Returns `Err` only when the program could not be started at all; a
    /// non-zero exit is reported through [`CommandOutput::code`].
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, AppError>;
}

/// Spawns real processes with `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, AppError> {
        let output: Output = Command::new(program).args(args).output()?;
        Ok(output.into())
    }
}
