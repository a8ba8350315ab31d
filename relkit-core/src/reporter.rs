//! Trait for reporting pipeline progress.

use std::time::Duration;

use crate::error::Error;
use crate::task::TaskRef;

/// Receives progress events from the runner.
///
/// This keeps the core library free of stdout/stderr writes; the CLI decides
/// how progress and tool output are shown.
pub trait RunReporter: Send + Sync {
    /// A step is about to run. `index` is zero-based.
    fn step_started(&self, index: usize, total: usize, task: &TaskRef, description: &str);

    /// A line printed by a tool the step invoked.
    fn step_output(&self, task: &TaskRef, line: &str, is_stderr: bool);

    /// A step finished successfully, or was only planned when `dry_run` is set.
    fn step_finished(&self, task: &TaskRef, elapsed: Duration, dry_run: bool);

    /// A step failed; no further steps will run.
    fn step_failed(&self, task: &TaskRef, error: &Error);
}

/// Reporter that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl RunReporter for NullReporter {
    fn step_started(&self, _index: usize, _total: usize, _task: &TaskRef, _description: &str) {}
    fn step_output(&self, _task: &TaskRef, _line: &str, _is_stderr: bool) {}
    fn step_finished(&self, _task: &TaskRef, _elapsed: Duration, _dry_run: bool) {}
    fn step_failed(&self, _task: &TaskRef, _error: &Error) {}
}
