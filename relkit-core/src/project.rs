//! Loading everything a run needs from a project root.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;

use crate::config::TaskConfig;
use crate::error::Result;
use crate::metadata::ProjectMetadata;
use crate::reporter::RunReporter;
use crate::runner::TaskRunner;
use crate::task::{Step, TaskRef};
use crate::template::TemplateContext;

/// Configuration, metadata and template context of one project.
///
/// Everything is read once; nothing here changes during a run.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: TaskConfig,
    pub metadata: ProjectMetadata,
    pub context: TemplateContext,
}

impl Project {
    /// Loads the task configuration, `package.json` and the builder manifest.
    ///
    /// # Errors
    ///
    /// Any missing or malformed input is fatal.
    pub fn load(root: impl Into<PathBuf>, config_path: Option<&Path>) -> Result<Self> {
        let root = root.into();
        let config = TaskConfig::load(&root, config_path)?;
        let sources = config.sources().clone();
        let metadata = ProjectMetadata::load(&root, &sources.info, sources.builder.as_deref())?;
        let context = TemplateContext::for_project(config.data(), &metadata, Utc::now());

        tracing::debug!(
            "loaded {} {} from {}",
            metadata.info.name,
            metadata.info.version,
            root.display()
        );

        Ok(Self {
            root,
            config,
            metadata,
            context,
        })
    }

    pub fn into_runner<F, R>(self, step_factory: F, reporter: R) -> TaskRunner
    where
        F: Fn(&TaskRef, Value) -> Result<Box<dyn Step>> + Send + Sync + 'static,
        R: RunReporter + 'static,
    {
        TaskRunner::new(self.root, self.config, self.context, step_factory, reporter)
    }
}
