pub mod banner;
pub mod beautify;
pub mod bundle;
pub mod docs;
pub mod fields;
pub mod process;
pub mod replace;
pub mod shell;
pub mod testify;

pub use banner::BannerStep;
pub use beautify::BeautifyStep;
pub use bundle::BuildStep;
pub use docs::DocsStep;
pub use replace::{ReplaceStep, Rule, RuleSet, RuleSpec};
pub use shell::ShellStep;
pub use testify::TestifyStep;

use relkit_core::{Error, Result, Step, TaskRef};
use serde_json::Value;

/// Task kinds [`create_step`] knows how to build.
pub const TASK_KINDS: &[&str] = &[
    "build",
    "string-replace",
    "beautify",
    "bannerize",
    "docco",
    "shell",
    "testify",
];

pub fn create_step(task: &TaskRef, value: Value) -> Result<Box<dyn Step>> {
    match task.kind.as_str() {
        "build" => Ok(Box::new(BuildStep::from_target(task, value)?)),
        "string-replace" => Ok(Box::new(ReplaceStep::from_target(task, value)?)),
        "beautify" => Ok(Box::new(BeautifyStep::from_target(task, value)?)),
        "bannerize" => Ok(Box::new(BannerStep::from_target(task, value)?)),
        "docco" => Ok(Box::new(DocsStep::from_target(task, value)?)),
        "shell" => Ok(Box::new(ShellStep::from_target(task, value)?)),
        "testify" => Ok(Box::new(TestifyStep::from_target(task, value)?)),
        _ => Err(Error::UnsupportedTask(task.kind.clone())),
    }
}
