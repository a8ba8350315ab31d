//! `testify` task kind: renders test-harness pages from templates.

use std::fs;
use std::path::Path;

use relkit_core::{parse_target, Error, Result, Step, StepContext, TaskRef, TemplateContext};
use serde::Deserialize;
use serde_json::{Map, Value};

/// File-name marker replaced by each configuration name.
pub const CONFIGURATION_MARKER: &str = "__configuration__";

#[derive(Debug, Deserialize)]
struct TestifyTarget {
    template: String,
    out: String,
    #[serde(default)]
    builder: Value,
    #[serde(default)]
    root: String,
    #[serde(default)]
    dist_prefix: Option<String>,
}

/// Renders a template once per builder configuration into `out`.
///
/// Templates only support `<%= path %>` interpolation. Paths resolve against
/// `builder`, `root`, `configuration` and, when `dist_prefix` is set, `dist`
/// (`<dist_prefix><configuration>`). A template whose file name has no
/// `__configuration__` marker is rendered once, without `configuration`.
#[derive(Debug, Clone)]
pub struct TestifyStep {
    template: String,
    out: String,
    builder: Value,
    root: String,
    dist_prefix: Option<String>,
}

impl TestifyStep {
    pub fn from_target(task: &TaskRef, value: Value) -> Result<Self> {
        let target: TestifyTarget = parse_target(task, value)?;
        Ok(Self {
            template: target.template,
            out: target.out,
            builder: target.builder,
            root: target.root,
            dist_prefix: target.dist_prefix,
        })
    }

    /// Configuration names from the builder manifest, in manifest order.
    pub fn configurations(&self) -> Vec<String> {
        self.builder
            .get("configurations")
            .and_then(Value::as_object)
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn render(&self, source: &str, configuration: Option<&str>) -> Result<String> {
        let mut root = Map::new();
        root.insert("builder".to_string(), self.builder.clone());
        root.insert("root".to_string(), Value::String(self.root.clone()));
        if let Some(name) = configuration {
            root.insert("configuration".to_string(), Value::String(name.to_string()));
            if let Some(prefix) = &self.dist_prefix {
                root.insert("dist".to_string(), Value::String(format!("{}{}", prefix, name)));
            }
        }
        TemplateContext::new(Value::Object(root)).render(source)
    }

    /// `__configuration__.html.ejs` becomes `jquery.html` for `jquery`.
    fn output_name(&self, configuration: Option<&str>) -> String {
        let file_name = Path::new(&self.template)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = file_name.strip_suffix(".ejs").unwrap_or(&file_name);
        match configuration {
            Some(name) => stem.replace(CONFIGURATION_MARKER, name),
            None => stem.to_string(),
        }
    }

    fn per_configuration(&self) -> bool {
        self.output_name(None).contains(CONFIGURATION_MARKER)
    }
}

impl Step for TestifyStep {
    fn describe(&self) -> String {
        format!("render {} into {}", self.template, self.out)
    }

    fn run(&self, ctx: &StepContext<'_>) -> Result<()> {
        let source_path = ctx.path(&self.template);
        let source = fs::read_to_string(&source_path).map_err(|e| Error::io(&source_path, e))?;

        let configurations: Vec<Option<String>> = if self.per_configuration() {
            let names = self.configurations();
            if names.is_empty() {
                return Err(Error::InvalidTarget {
                    task: ctx.task().to_string(),
                    message: format!(
                        "{} needs builder.configurations, but the manifest has none",
                        self.template
                    ),
                });
            }
            names.into_iter().map(Some).collect()
        } else {
            vec![None]
        };

        let out_dir = ctx.path(&self.out);
        fs::create_dir_all(&out_dir).map_err(|e| Error::io(&out_dir, e))?;

        for configuration in &configurations {
            let name = configuration.as_deref();
            let rendered = self.render(&source, name)?;
            let target = out_dir.join(self.output_name(name));
            fs::write(&target, rendered).map_err(|e| Error::io(&target, e))?;
            tracing::debug!("{}: wrote {}", ctx.task(), target.display());
        }

        tracing::info!("{}: rendered {} pages", ctx.task(), configurations.len());
        Ok(())
    }
}
