//! Task references and the step contract.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::reporter::RunReporter;

/// A primitive task: a task kind plus one of its targets (`shell:cleanup`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskRef {
    pub kind: String,
    pub target: String,
}

impl TaskRef {
    pub fn new(kind: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            target: target.into(),
        }
    }

    /// Parses `kind:target`.
    ///
    /// Returns `None` for a bare name, which may be a pipeline or a whole
    /// task kind.
    pub fn parse(name: &str) -> Option<Self> {
        let (kind, target) = name.split_once(':')?;
        if kind.is_empty() || target.is_empty() {
            return None;
        }
        Some(Self::new(kind, target))
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.target)
    }
}

/// What a step sees while it runs.
pub struct StepContext<'a> {
    root: &'a Path,
    task: &'a TaskRef,
    reporter: &'a dyn RunReporter,
}

impl<'a> StepContext<'a> {
    pub fn new(root: &'a Path, task: &'a TaskRef, reporter: &'a dyn RunReporter) -> Self {
        Self {
            root,
            task,
            reporter,
        }
    }

    /// Project root; every relative path in the configuration is relative to it.
    pub fn root(&self) -> &Path {
        self.root
    }

    pub fn task(&self) -> &TaskRef {
        self.task
    }

    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Forwards one line of tool output to the reporter.
    pub fn emit(&self, line: &str, is_stderr: bool) {
        self.reporter.step_output(self.task, line, is_stderr);
    }
}

/// A resolved task, ready to run.
///
/// Implementations are created by a [`StepFactory`] from the target's
/// configuration after templates are interpolated.
pub trait Step: Send + Sync {
    /// One-line human description, e.g. the shell command that will run.
    fn describe(&self) -> String;

    /// Runs the step to completion.
    ///
    /// # Errors
    ///
    /// Any error aborts the pipeline.
    fn run(&self, ctx: &StepContext<'_>) -> Result<()>;
}

/// Builds a step from a task reference and its resolved configuration.
pub type StepFactory = Box<dyn Fn(&TaskRef, Value) -> Result<Box<dyn Step>> + Send + Sync>;

/// Deserializes a resolved target, naming the task on failure.
pub fn parse_target<T: serde::de::DeserializeOwned>(task: &TaskRef, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::InvalidTarget {
        task: task.to_string(),
        message: e.to_string(),
    })
}
