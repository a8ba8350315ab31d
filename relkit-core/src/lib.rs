//! Core library for release pipelines: configuration, templates, task
//! expansion and sequential execution.

pub mod command_validator;
pub mod composer;
pub mod config;
pub mod error;
pub mod files;
pub mod metadata;
pub mod project;
pub mod reporter;
pub mod runner;
pub mod task;
pub mod template;

pub use command_validator::CommandValidator;
pub use composer::Composer;
pub use config::{Sources, TaskConfig, CONFIG_FILE};
pub use error::{Error, Result};
pub use files::FileSet;
pub use metadata::{ProjectInfo, ProjectMetadata};
pub use project::Project;
pub use reporter::{NullReporter, RunReporter};
pub use runner::{PlannedStep, RunPlan, RunSummary, StepRecord, TaskRunner};
pub use task::{parse_target, Step, StepContext, StepFactory, TaskRef};
pub use template::TemplateContext;
