//! Expansion of pipelines into ordered primitive tasks.

use crate::config::TaskConfig;
use crate::error::{Error, Result};
use crate::task::TaskRef;

/// Expands task names into the primitive tasks they stand for.
///
/// A name is, in lookup order:
/// - a pipeline, expanded recursively,
/// - `kind:target`,
/// - a bare task kind, meaning every target of that kind.
///
/// Repeats are preserved: a task listed twice runs twice.
pub struct Composer<'a> {
    config: &'a TaskConfig,
}

impl<'a> Composer<'a> {
    pub fn new(config: &'a TaskConfig) -> Self {
        Self { config }
    }

    /// Expands `names` in order.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names and for pipelines that include
    /// themselves, directly or through other pipelines.
    pub fn expand(&self, names: &[String]) -> Result<Vec<TaskRef>> {
        let mut order = Vec::new();
        let mut visiting = Vec::new();
        for name in names {
            self.visit(name, &mut order, &mut visiting)?;
        }
        Ok(order)
    }

    fn visit(&self, name: &str, order: &mut Vec<TaskRef>, visiting: &mut Vec<String>) -> Result<()> {
        if let Some(steps) = self.config.pipeline(name) {
            if visiting.iter().any(|v| v == name) {
                let mut cycle = visiting.clone();
                cycle.push(name.to_string());
                return Err(Error::CircularPipeline(cycle.join(" -> ")));
            }

            visiting.push(name.to_string());
            for step in steps {
                self.visit(step, order, visiting)?;
            }
            visiting.pop();
            return Ok(());
        }

        if let Some(task) = TaskRef::parse(name) {
            if !self.config.has_task(&task) {
                return Err(match self.config.targets(&task.kind) {
                    Some(targets) => Error::TargetNotFound {
                        kind: task.kind.clone(),
                        target: task.target.clone(),
                        available: targets.join(", "),
                    },
                    None => self.not_found(name),
                });
            }
            order.push(task);
            return Ok(());
        }

        match self.config.targets(name) {
            Some(targets) if !targets.is_empty() => {
                order.extend(targets.into_iter().map(|target| TaskRef::new(name, target)));
                Ok(())
            }
            _ => Err(self.not_found(name)),
        }
    }

    fn not_found(&self, name: &str) -> Error {
        let mut available: Vec<String> = self.config.pipelines().keys().cloned().collect();
        available.extend(self.config.task_kinds().into_iter().map(str::to_string));
        Error::TaskNotFound {
            name: name.to_string(),
            available: available.join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_kind_expands_to_all_targets() {
        let config = TaskConfig::from_toml_str(
            r#"
[shell.one]
command = "true"

[shell.two]
command = "true"

[shell.options]
stdout = false
"#,
            "test",
        )
        .unwrap();

        let tasks = Composer::new(&config).expand(&["shell".to_string()]).unwrap();
        assert_eq!(
            tasks,
            vec![TaskRef::new("shell", "one"), TaskRef::new("shell", "two")]
        );
    }
}
