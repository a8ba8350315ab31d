//! Task configuration: built-in defaults plus an optional `relkit.toml` overlay.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::task::TaskRef;
use crate::template::TemplateContext;

/// File name looked up in the project root.
pub const CONFIG_FILE: &str = "relkit.toml";

const DEFAULTS: &str = include_str!("defaults.toml");

/// Top-level tables that are not task kinds.
const RESERVED: &[&str] = &["sources", "pipelines", "meta", "info", "builder", "now"];

/// Key inside a task-kind table that holds options shared by every target.
const OPTIONS_KEY: &str = "options";

/// Where project metadata is read from, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub info: String,
    /// `None` when the builder manifest is disabled (`builder = ""`).
    pub builder: Option<String>,
}

/// Parsed task configuration.
///
/// The document is kept as JSON so it can double as the template context and
/// so targets can be interpolated before they are deserialized into typed
/// step configurations.
#[derive(Debug, Clone)]
pub struct TaskConfig {
    data: Value,
    pipelines: IndexMap<String, Vec<String>>,
    sources: Sources,
}

impl TaskConfig {
    /// The embedded default configuration.
    pub fn defaults() -> Result<Self> {
        Self::from_toml_str(DEFAULTS, "built-in defaults")
    }

    /// Parses a standalone configuration without the defaults underneath.
    pub fn from_toml_str(content: &str, context: &str) -> Result<Self> {
        Self::from_value(parse_toml(content, context)?)
    }

    /// Loads the defaults and merges `relkit.toml` (or `config_path`) over them.
    ///
    /// A missing `relkit.toml` in the root is fine; a missing explicit
    /// `config_path` is an error.
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let defaults = Self::defaults()?;
        let (path, required): (PathBuf, bool) = match config_path {
            Some(path) => (path.to_path_buf(), true),
            None => (root.join(CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                return Err(Error::io(
                    &path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
                ));
            }
            tracing::debug!("no {} found, using built-in defaults", path.display());
            return Ok(defaults);
        }

        let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        tracing::debug!("merging {} over built-in defaults", path.display());
        defaults.with_overlay(&content, &path.display().to_string())
    }

    /// Merges another TOML document over this configuration.
    pub fn with_overlay(self, content: &str, context: &str) -> Result<Self> {
        let overlay = parse_toml(content, context)?;
        let mut data = self.data;
        merge(&mut data, overlay);
        Self::from_value(data)
    }

    fn from_value(data: Value) -> Result<Self> {
        if !data.is_object() {
            return Err(Error::InvalidTarget {
                task: "configuration".to_string(),
                message: "top level must be a table".to_string(),
            });
        }

        let mut pipelines = IndexMap::new();
        if let Some(table) = data.get("pipelines") {
            let table = table.as_object().ok_or_else(|| Error::InvalidTarget {
                task: "pipelines".to_string(),
                message: "must be a table of task lists".to_string(),
            })?;
            for (name, steps) in table {
                let steps = steps
                    .as_array()
                    .and_then(|items| {
                        items
                            .iter()
                            .map(|v| v.as_str().map(str::to_string))
                            .collect::<Option<Vec<_>>>()
                    })
                    .ok_or_else(|| Error::InvalidTarget {
                        task: format!("pipelines.{}", name),
                        message: "must be a list of task names".to_string(),
                    })?;
                pipelines.insert(name.clone(), steps);
            }
        }

        let source = |key: &str| data.get("sources").and_then(|s| s.get(key)).and_then(Value::as_str);
        let sources = Sources {
            info: source("info").unwrap_or("package.json").to_string(),
            builder: source("builder")
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };

        Ok(Self {
            data,
            pipelines,
            sources,
        })
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn sources(&self) -> &Sources {
        &self.sources
    }

    pub fn pipelines(&self) -> &IndexMap<String, Vec<String>> {
        &self.pipelines
    }

    pub fn pipeline(&self, name: &str) -> Option<&[String]> {
        self.pipelines.get(name).map(Vec::as_slice)
    }

    /// Task kinds in declaration order.
    pub fn task_kinds(&self) -> Vec<&str> {
        self.data
            .as_object()
            .map(|map| {
                map.iter()
                    .filter(|(key, value)| value.is_object() && !RESERVED.contains(&key.as_str()))
                    .map(|(key, _)| key.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Targets of a task kind in declaration order, or `None` for an unknown kind.
    pub fn targets(&self, kind: &str) -> Option<Vec<&str>> {
        self.kind_table(kind).map(|table| {
            table
                .keys()
                .filter(|key| key.as_str() != OPTIONS_KEY)
                .map(String::as_str)
                .collect()
        })
    }

    /// Every primitive task, `kind:target`, in declaration order.
    pub fn all_tasks(&self) -> Vec<TaskRef> {
        self.task_kinds()
            .into_iter()
            .flat_map(|kind| {
                self.targets(kind)
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |target| TaskRef::new(kind, target))
            })
            .collect()
    }

    pub fn has_task(&self, task: &TaskRef) -> bool {
        task.target != OPTIONS_KEY
            && self
                .kind_table(&task.kind)
                .is_some_and(|table| table.contains_key(&task.target))
    }

    /// Produces the interpolated configuration of one target.
    ///
    /// Kind-level `options` are merged beneath the target's own `options`.
    /// A target written as a bare string or list is shorthand for `files`.
    pub fn resolve_target(&self, task: &TaskRef, ctx: &TemplateContext) -> Result<Value> {
        let table = self.kind_table(&task.kind).ok_or_else(|| Error::TaskNotFound {
            name: task.kind.clone(),
            available: self.task_kinds().join(", "),
        })?;

        let raw = table
            .get(&task.target)
            .filter(|_| task.target != OPTIONS_KEY)
            .ok_or_else(|| Error::TargetNotFound {
                kind: task.kind.clone(),
                target: task.target.clone(),
                available: self.targets(&task.kind).unwrap_or_default().join(", "),
            })?;

        let mut options = match table.get(OPTIONS_KEY) {
            Some(value) => ctx.resolve(value)?,
            None => Value::Object(Map::new()),
        };

        let mut target = match ctx.resolve(raw)? {
            Value::Object(map) => map,
            files => {
                let mut map = Map::new();
                map.insert("files".to_string(), files);
                map
            }
        };

        if let Some(own) = target.remove(OPTIONS_KEY) {
            merge(&mut options, own);
        }
        target.insert(OPTIONS_KEY.to_string(), options);

        Ok(Value::Object(target))
    }

    fn kind_table(&self, kind: &str) -> Option<&Map<String, Value>> {
        if RESERVED.contains(&kind) {
            return None;
        }
        self.data.get(kind).and_then(Value::as_object)
    }
}

fn parse_toml(content: &str, context: &str) -> Result<Value> {
    let value: toml::Value = toml::from_str(content).map_err(|error| Error::Toml {
        error,
        context: context.to_string(),
    })?;
    serde_json::to_value(value).map_err(|e| Error::InvalidTarget {
        task: context.to_string(),
        message: e.to_string(),
    })
}

/// Deep-merges `overlay` into `base`: tables merge key by key, anything else
/// replaces.
pub fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_replaces_lists() {
        let mut base = json!({ "a": { "b": [1, 2], "c": 1 } });
        merge(&mut base, json!({ "a": { "b": [3] } }));
        assert_eq!(base, json!({ "a": { "b": [3], "c": 1 } }));
    }

    #[test]
    fn reserved_tables_are_not_kinds() {
        let config = TaskConfig::defaults().unwrap();
        let kinds = config.task_kinds();
        assert!(!kinds.contains(&"meta"));
        assert!(!kinds.contains(&"pipelines"));
        assert!(kinds.contains(&"shell"));
    }

    #[test]
    fn options_is_not_a_target() {
        let config = TaskConfig::defaults().unwrap();
        assert!(!config.has_task(&TaskRef::new("shell", "options")));
        assert!(!config.targets("shell").unwrap().contains(&"options"));
    }
}
