//! `bannerize` task kind: prepend a license banner to built files.

use std::fs;

use relkit_core::{parse_target, Error, FileSet, Result, Step, StepContext, TaskRef};
use serde::Deserialize;
use serde_json::Value;

use crate::fields::OneOrMany;

#[derive(Debug, Deserialize)]
struct BannerTarget {
    files: OneOrMany<String>,
    banner: String,
    #[serde(default)]
    exclude: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BannerStep {
    files: FileSet,
    banner: String,
}

impl BannerStep {
    pub fn new(files: FileSet, banner: impl Into<String>) -> Self {
        Self {
            files,
            banner: banner.into(),
        }
    }

    pub fn from_target(task: &TaskRef, value: Value) -> Result<Self> {
        let target: BannerTarget = parse_target(task, value)?;
        if target.banner.trim().is_empty() {
            return Err(Error::InvalidTarget {
                task: task.to_string(),
                message: "banner cannot be empty".to_string(),
            });
        }
        let files = FileSet::new(&target.files.into_vec(), &target.exclude)?;
        Ok(Self::new(files, target.banner))
    }

    /// Returns the file content with the banner in front, or `None` if it
    /// already starts with it.
    pub fn bannerize(&self, content: &str) -> Option<String> {
        if content.starts_with(&self.banner) {
            return None;
        }
        Some(format!("{}\n{}", self.banner, content))
    }
}

impl Step for BannerStep {
    fn describe(&self) -> String {
        format!("prepend banner to {}", self.files.patterns().join(", "))
    }

    fn run(&self, ctx: &StepContext<'_>) -> Result<()> {
        let files = self
            .files
            .expand_required(ctx.root(), &ctx.task().to_string())?;

        for file in &files {
            let path = ctx.path(file);
            let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
            match self.bannerize(&content) {
                Some(updated) => fs::write(&path, updated).map_err(|e| Error::io(&path, e))?,
                None => tracing::debug!("{} already has the banner", file.display()),
            }
        }
        Ok(())
    }
}
