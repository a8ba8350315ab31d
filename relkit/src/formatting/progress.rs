//! Progress bar for pipeline steps.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Creates the step counter shown while a pipeline runs.
///
/// Hidden when `quiet` is set; tool output is still printed through it.
pub fn create_step_progress(quiet: bool) -> ProgressBar {
    let pb = ProgressBar::new(0);
    if quiet {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/.blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
    pb.set_style(style);
    pb
}
