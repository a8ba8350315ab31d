//! `shell` task kind: one `sh -c` command in the project root.

use std::process::Command;

use relkit_core::{parse_target, CommandValidator, Result, Step, StepContext, TaskRef};
use serde::Deserialize;
use serde_json::Value;

use crate::process::run_process;

#[derive(Debug, Deserialize)]
struct ShellTarget {
    command: String,
    #[serde(default)]
    options: ShellOptions,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ShellOptions {
    stdout: bool,
    fail_on_error: bool,
    /// Only accept a single program invocation, no shell operators.
    strict: bool,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            stdout: true,
            fail_on_error: true,
            strict: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShellStep {
    command: String,
    stdout: bool,
    fail_on_error: bool,
}

impl ShellStep {
    /// A step that streams output and fails on a non-zero exit.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            stdout: true,
            fail_on_error: true,
        }
    }

    pub fn from_target(task: &TaskRef, value: Value) -> Result<Self> {
        let target: ShellTarget = parse_target(task, value)?;
        let validator = if target.options.strict {
            CommandValidator::strict()
        } else {
            CommandValidator::new()
        };
        validator.validate(&target.command)?;
        Ok(Self {
            command: target.command,
            stdout: target.options.stdout,
            fail_on_error: target.options.fail_on_error,
        })
    }

    pub fn with_stdout(mut self, stdout: bool) -> Self {
        self.stdout = stdout;
        self
    }

    pub fn with_fail_on_error(mut self, fail_on_error: bool) -> Self {
        self.fail_on_error = fail_on_error;
        self
    }
}

impl Step for ShellStep {
    fn describe(&self) -> String {
        self.command.clone()
    }

    fn run(&self, ctx: &StepContext<'_>) -> Result<()> {
        let mut command = Command::new("sh");
        command.arg("-c").arg(&self.command);

        let outcome = run_process(ctx, command, &self.command, self.stdout)?;
        if !outcome.success() && !self.fail_on_error {
            tracing::warn!(
                "{} exited unsuccessfully ({}), continuing",
                ctx.task(),
                outcome.status
            );
            return Ok(());
        }
        outcome.check(ctx, &self.command)
    }
}
