//! Command implementations for the CLI.

mod info;
mod run;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use relkit_core::Project;

pub use info::{cmd_check, cmd_list, cmd_plan};
pub use run::cmd_run;

fn load_project(root: &Path, config: Option<&PathBuf>) -> Result<Project> {
    Project::load(root, config.map(PathBuf::as_path))
        .with_context(|| format!("Failed to load project at {}", root.display()))
}

/// Process exit code for a failed run: the failing command's own code when
/// there is one.
fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<relkit_core::Error>()
        .and_then(relkit_core::Error::exit_code)
        .unwrap_or(1)
}
