//! `build` task kind: hands a build script to the external bundler.

use std::process::Command;

use relkit_core::{parse_target, Error, Result, Step, StepContext, TaskRef};
use serde::Deserialize;
use serde_json::Value;

use crate::fields::{display_command, OneOrMany};
use crate::process::run_process;

/// Channel directory used when no version is given.
pub const EDGE_CHANNEL: &str = "edge";

#[derive(Debug, Deserialize)]
struct BuildTarget {
    src: String,
    out: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    options: BuildOptions,
}

#[derive(Debug, Deserialize)]
struct BuildOptions {
    #[serde(default = "default_program")]
    program: OneOrMany<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

fn default_program() -> OneOrMany<String> {
    OneOrMany::One("node".to_string())
}

/// Runs `<program...> <src> --out <out>/<channel> [--version <version>]`.
///
/// The channel is the version for tagged builds and `edge` otherwise, so a
/// versioned build lands in `dist/2.3.0` and an edge build in `dist/edge`.
#[derive(Debug, Clone)]
pub struct BuildStep {
    program: String,
    args: Vec<String>,
    out_dir: String,
}

impl BuildStep {
    pub fn new(program: Vec<String>, src: &str, out: &str, version: Option<&str>) -> Result<Self> {
        let mut program = program.into_iter();
        let executable = program.next().ok_or_else(|| Error::InvalidTarget {
            task: "build".to_string(),
            message: "options.program cannot be empty".to_string(),
        })?;

        let channel = version.unwrap_or(EDGE_CHANNEL);
        let out_dir = format!("{}/{}", out.trim_end_matches('/'), channel);

        let mut args: Vec<String> = program.collect();
        args.push(src.to_string());
        args.push("--out".to_string());
        args.push(out_dir.clone());
        if let Some(version) = version {
            args.push("--version".to_string());
            args.push(version.to_string());
        }

        Ok(Self {
            program: executable,
            args,
            out_dir,
        })
    }

    pub fn from_target(task: &TaskRef, value: Value) -> Result<Self> {
        let target: BuildTarget = parse_target(task, value)?;
        Self::new(
            target.options.program.into_vec(),
            &target.src,
            &target.out,
            target.version.as_deref(),
        )
        .map_err(|e| match e {
            Error::InvalidTarget { message, .. } => Error::InvalidTarget {
                task: task.to_string(),
                message,
            },
            other => other,
        })
    }

    /// Directory the bundler writes to.
    pub fn out_dir(&self) -> &str {
        &self.out_dir
    }
}

impl Step for BuildStep {
    fn describe(&self) -> String {
        display_command(&self.program, &self.args)
    }

    fn run(&self, ctx: &StepContext<'_>) -> Result<()> {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        let display = self.describe();
        run_process(ctx, command, &display, true)?.check(ctx, &display)
    }
}
