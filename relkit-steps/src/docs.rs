//! `docco` task kind: generates annotated-source documentation.

use std::process::Command;

use relkit_core::{parse_target, Error, FileSet, Result, Step, StepContext, TaskRef};
use serde::Deserialize;
use serde_json::Value;

use crate::fields::{display_command, OneOrMany};
use crate::process::run_process;

#[derive(Debug, Deserialize)]
struct DocsTarget {
    files: OneOrMany<String>,
    output: String,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    options: DocsOptions,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DocsOptions {
    exclude: Vec<String>,
    program: OneOrMany<String>,
}

impl Default for DocsOptions {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            program: OneOrMany::One("docco".to_string()),
        }
    }
}

/// Runs `<program> --output <output> <files...>` once for the whole set.
#[derive(Debug, Clone)]
pub struct DocsStep {
    files: FileSet,
    output: String,
    program: Vec<String>,
}

impl DocsStep {
    pub fn from_target(task: &TaskRef, value: Value) -> Result<Self> {
        let target: DocsTarget = parse_target(task, value)?;
        let mut exclude = target.exclude;
        exclude.extend(target.options.exclude);

        let program = target.options.program.into_vec();
        if program.is_empty() {
            return Err(Error::InvalidTarget {
                task: task.to_string(),
                message: "options.program cannot be empty".to_string(),
            });
        }

        Ok(Self {
            files: FileSet::new(&target.files.into_vec(), &exclude)?,
            output: target.output,
            program,
        })
    }

    fn args(&self, inputs: Vec<String>) -> Vec<String> {
        let mut args: Vec<String> = self.program[1..].to_vec();
        args.push("--output".to_string());
        args.push(self.output.clone());
        args.extend(inputs);
        args
    }
}

impl Step for DocsStep {
    fn describe(&self) -> String {
        let inputs = self.files.patterns().into_iter().map(str::to_string).collect();
        display_command(&self.program[0], &self.args(inputs))
    }

    fn run(&self, ctx: &StepContext<'_>) -> Result<()> {
        let files = self
            .files
            .expand_required(ctx.root(), &ctx.task().to_string())?;
        let inputs = files
            .iter()
            .map(|f| f.to_string_lossy().to_string())
            .collect();

        let args = self.args(inputs);
        let display = display_command(&self.program[0], &args);
        let mut command = Command::new(&self.program[0]);
        command.args(&args);
        run_process(ctx, command, &display, true)?.check(ctx, &display)
    }
}
