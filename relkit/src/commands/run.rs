//! Running tasks and pipelines.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use relkit_core::{NullReporter, RunSummary};
use relkit_steps::create_step;

use crate::formatting::{
    create_step_progress, format_duration, print_error, print_key_value, print_section_header,
    print_separator_with_spacing, print_summary_box, SectionStyle,
};
use crate::reporter::CliReporter;

use super::{exit_code, load_project};

pub fn cmd_run(
    root: PathBuf,
    config: Option<PathBuf>,
    tasks: Vec<String>,
    dry_run: bool,
    quiet: bool,
) -> Result<()> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set signal handler: {}", e))?;

    let project = load_project(&root, config.as_ref())?;

    if !quiet {
        let title = if dry_run { "Run (Dry Run)" } else { "Run" };
        print_section_header(title, SectionStyle::Primary);
        print_key_value(
            "Project",
            &format!(
                "{} {}",
                project.metadata.info.name, project.metadata.info.version
            ),
        );
        print_key_value("Root", &project.root.display().to_string());
        print_key_value("Tasks", &tasks.join(", "));
        println!();
    }

    let pb = create_step_progress(quiet);
    let result = if quiet {
        project
            .into_runner(create_step, NullReporter)
            .with_dry_run(dry_run)
            .with_interrupt(interrupted)
            .run(&tasks)
    } else {
        project
            .into_runner(create_step, CliReporter::new(pb.clone()))
            .with_dry_run(dry_run)
            .with_interrupt(interrupted)
            .run(&tasks)
    };
    pb.finish_and_clear();

    match result {
        Ok(summary) => {
            if !quiet {
                print_run_summary(&summary);
            }
            Ok(())
        }
        Err(e) => {
            let error = anyhow::Error::new(e);
            print_error(&error.to_string());
            std::process::exit(exit_code(&error));
        }
    }
}

fn print_run_summary(summary: &RunSummary) {
    print_separator_with_spacing();
    let title = if summary.dry_run {
        "Dry Run Summary"
    } else {
        "Run Summary"
    };
    print_summary_box(
        title,
        &[
            ("Steps", &summary.steps.len().to_string()),
            ("Duration", &format_duration(summary.elapsed.as_secs_f64())),
        ],
    );
}
