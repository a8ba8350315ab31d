//! Console reporter for pipeline runs.

use std::time::Duration;

use indicatif::ProgressBar;
use owo_colors::OwoColorize;
use relkit_core::{Error, RunReporter, TaskRef};

use crate::formatting::{format_duration, Mark};

/// Prints step progress above an indicatif bar.
///
/// Lines go through [`ProgressBar::println`] so tool output never tears
/// the bar. A hidden bar (no terminal) drops `println`, so lines are then
/// written directly.
pub struct CliReporter {
    pb: ProgressBar,
}

impl CliReporter {
    pub fn new(pb: ProgressBar) -> Self {
        Self { pb }
    }

    fn line(&self, message: String) {
        if self.pb.is_hidden() {
            println!("{}", message);
        } else {
            self.pb.println(message);
        }
    }
}

impl RunReporter for CliReporter {
    fn step_started(&self, index: usize, total: usize, task: &TaskRef, description: &str) {
        self.pb.set_length(total as u64);
        self.pb.set_position(index as u64);
        self.pb.set_message(task.to_string());
        self.line(format!(
            "{} {}",
            Mark::Start.line(&task.to_string()),
            description.bright_black()
        ));
    }

    fn step_output(&self, _task: &TaskRef, line: &str, is_stderr: bool) {
        if is_stderr {
            self.line(format!("    {}", line.red()));
        } else {
            self.line(format!("    {}", line));
        }
    }

    fn step_finished(&self, task: &TaskRef, elapsed: Duration, dry_run: bool) {
        self.pb.inc(1);
        let line = if dry_run {
            Mark::Planned.line(&format!("{} (dry run)", task))
        } else {
            Mark::Done.line(&format!(
                "{} ({})",
                task,
                format_duration(elapsed.as_secs_f64())
            ))
        };
        self.line(format!("  {}", line));
    }

    fn step_failed(&self, task: &TaskRef, _error: &Error) {
        self.line(format!(
            "  {}",
            Mark::Failed.line(&format!("{} failed", task))
        ));
    }
}
