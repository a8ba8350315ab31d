//! Sequential, fail-fast pipeline execution.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::composer::Composer;
use crate::config::TaskConfig;
use crate::error::{Error, Result};
use crate::reporter::RunReporter;
use crate::task::{Step, StepContext, StepFactory, TaskRef};
use crate::template::TemplateContext;

/// Expands task names, resolves them into steps and runs the steps in order.
pub struct TaskRunner {
    root: PathBuf,
    config: TaskConfig,
    context: TemplateContext,
    step_factory: StepFactory,
    reporter: Box<dyn RunReporter>,
    dry_run: bool,
    interrupted: Option<Arc<AtomicBool>>,
}

/// A task resolved into a runnable step.
pub struct PlannedStep {
    pub task: TaskRef,
    pub step: Box<dyn Step>,
}

impl PlannedStep {
    pub fn describe(&self) -> String {
        self.step.describe()
    }
}

impl std::fmt::Debug for PlannedStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannedStep")
            .field("task", &self.task)
            .field("step", &self.describe())
            .finish()
    }
}

/// Every step a run will execute, in order.
#[derive(Debug)]
pub struct RunPlan {
    pub steps: Vec<PlannedStep>,
}

impl RunPlan {
    pub fn tasks(&self) -> Vec<&TaskRef> {
        self.steps.iter().map(|s| &s.task).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A step that completed.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub task: TaskRef,
    pub description: String,
    pub elapsed: Duration,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub steps: Vec<StepRecord>,
    pub elapsed: Duration,
    pub dry_run: bool,
}

impl TaskRunner {
    /// Creates a runner rooted at `root`.
    ///
    /// The `step_factory` turns a task and its interpolated configuration into
    /// a step; it decides which task kinds exist. The `reporter` receives
    /// progress events so the library never writes to the console itself.
    pub fn new<F, R>(
        root: impl Into<PathBuf>,
        config: TaskConfig,
        context: TemplateContext,
        step_factory: F,
        reporter: R,
    ) -> Self
    where
        F: Fn(&TaskRef, Value) -> Result<Box<dyn Step>> + Send + Sync + 'static,
        R: RunReporter + 'static,
    {
        Self {
            root: root.into(),
            config,
            context,
            step_factory: Box::new(step_factory),
            reporter: Box::new(reporter),
            dry_run: false,
            interrupted: None,
        }
    }

    /// When set, steps are reported but not executed.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// A flag that, once set, stops the run before the next step.
    pub fn with_interrupt(mut self, interrupted: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(interrupted);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    pub fn context(&self) -> &TemplateContext {
        &self.context
    }

    pub fn expand(&self, names: &[String]) -> Result<Vec<TaskRef>> {
        Composer::new(&self.config).expand(names)
    }

    /// Resolves every task up front, so configuration mistakes surface before
    /// anything touches the filesystem.
    ///
    /// # Errors
    ///
    /// Returns the first expansion, template or step-construction error,
    /// wrapped with the name of the task it belongs to.
    pub fn plan(&self, names: &[String]) -> Result<RunPlan> {
        let tasks = self.expand(names)?;
        let mut steps = Vec::with_capacity(tasks.len());

        for task in tasks {
            let step = self
                .config
                .resolve_target(&task, &self.context)
                .and_then(|value| (self.step_factory)(&task, value))
                .map_err(|e| Error::Step {
                    task: task.to_string(),
                    source: Box::new(e),
                })?;
            tracing::debug!("planned {}: {}", task, step.describe());
            steps.push(PlannedStep { task, step });
        }

        Ok(RunPlan { steps })
    }

    pub fn run(&self, names: &[String]) -> Result<RunSummary> {
        let plan = self.plan(names)?;
        self.execute(&plan)
    }

    /// Runs a plan strictly in order and stops at the first failing step.
    pub fn execute(&self, plan: &RunPlan) -> Result<RunSummary> {
        let start = Instant::now();
        let total = plan.len();
        let mut records = Vec::with_capacity(total);

        for (index, planned) in plan.steps.iter().enumerate() {
            if self.is_interrupted() {
                tracing::warn!("interrupted before {}", planned.task);
                return Err(Error::Interrupted(planned.task.to_string()));
            }

            let description = planned.describe();
            self.reporter
                .step_started(index, total, &planned.task, &description);

            let step_start = Instant::now();
            if !self.dry_run {
                tracing::info!("running {}", planned.task);
                let ctx = StepContext::new(&self.root, &planned.task, self.reporter.as_ref());
                if let Err(e) = planned.step.run(&ctx) {
                    self.reporter.step_failed(&planned.task, &e);
                    return Err(Error::Step {
                        task: planned.task.to_string(),
                        source: Box::new(e),
                    });
                }
            }
            let elapsed = step_start.elapsed();

            self.reporter
                .step_finished(&planned.task, elapsed, self.dry_run);
            records.push(StepRecord {
                task: planned.task.clone(),
                description,
                elapsed,
            });
        }

        Ok(RunSummary {
            steps: records,
            elapsed: start.elapsed(),
            dry_run: self.dry_run,
        })
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}
