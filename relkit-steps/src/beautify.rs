//! `beautify` task kind: re-runs the external code formatter over files.

use std::process::Command;

use relkit_core::{parse_target, FileSet, Result, Step, StepContext, TaskRef};
use serde::Deserialize;
use serde_json::Value;

use crate::fields::{display_command, OneOrMany};
use crate::process::run_process;

#[derive(Debug, Deserialize)]
struct BeautifyTarget {
    files: OneOrMany<String>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    options: BeautifyOptions,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct BeautifyOptions {
    indent_size: u32,
    indent_char: String,
    exclude: Vec<String>,
    program: OneOrMany<String>,
}

impl Default for BeautifyOptions {
    fn default() -> Self {
        Self {
            indent_size: 4,
            indent_char: " ".to_string(),
            exclude: Vec::new(),
            program: OneOrMany::One("js-beautify".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BeautifyStep {
    files: FileSet,
    program: Vec<String>,
    indent_size: u32,
    indent_char: String,
}

impl BeautifyStep {
    pub fn from_target(task: &TaskRef, value: Value) -> Result<Self> {
        let target: BeautifyTarget = parse_target(task, value)?;
        let mut exclude = target.exclude;
        exclude.extend(target.options.exclude);

        let program = target.options.program.into_vec();
        if program.is_empty() {
            return Err(relkit_core::Error::InvalidTarget {
                task: task.to_string(),
                message: "options.program cannot be empty".to_string(),
            });
        }

        Ok(Self {
            files: FileSet::new(&target.files.into_vec(), &exclude)?,
            program,
            indent_size: target.options.indent_size,
            indent_char: target.options.indent_char,
        })
    }

    /// Formatter invocation for one file.
    fn invocation(&self, file: &str) -> (String, Vec<String>) {
        let mut args: Vec<String> = self.program[1..].to_vec();
        args.extend([
            "--indent-size".to_string(),
            self.indent_size.to_string(),
            "--indent-char".to_string(),
            self.indent_char.clone(),
            "--replace".to_string(),
            file.to_string(),
        ]);
        (self.program[0].clone(), args)
    }
}

impl Step for BeautifyStep {
    fn describe(&self) -> String {
        let patterns = self.files.patterns().join(" ");
        let (program, args) = self.invocation(&patterns);
        display_command(&program, &args)
    }

    fn run(&self, ctx: &StepContext<'_>) -> Result<()> {
        let files = self
            .files
            .expand_required(ctx.root(), &ctx.task().to_string())?;

        for file in &files {
            let (program, args) = self.invocation(&file.to_string_lossy());
            let display = display_command(&program, &args);
            let mut command = Command::new(&program);
            command.args(&args);
            run_process(ctx, command, &display, true)?.check(ctx, &display)?;
        }

        tracing::info!("{}: formatted {} files", ctx.task(), files.len());
        Ok(())
    }
}
