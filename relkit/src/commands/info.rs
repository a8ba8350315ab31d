//! Information and validation commands.

use std::path::PathBuf;

use anyhow::Result;
use relkit_core::{NullReporter, TaskRunner};
use relkit_steps::{create_step, TASK_KINDS};
use serde_json::{json, Map, Value};

use crate::formatting::{
    print_check_table, print_error, print_key_value, print_pipeline_table, print_plan_table,
    print_section_header, print_success, print_task_table, print_warning, SectionStyle,
};

use super::load_project;

pub fn cmd_list(root: PathBuf, config: Option<PathBuf>, json: bool) -> Result<()> {
    let project = load_project(&root, config.as_ref())?;
    let task_config = &project.config;

    let pipelines: Vec<(String, Vec<String>)> = task_config
        .pipelines()
        .iter()
        .map(|(name, steps)| (name.clone(), steps.clone()))
        .collect();
    let kinds: Vec<(String, Vec<String>, bool)> = task_config
        .task_kinds()
        .into_iter()
        .map(|kind| {
            let targets = task_config
                .targets(kind)
                .unwrap_or_default()
                .into_iter()
                .map(str::to_string)
                .collect();
            (kind.to_string(), targets, TASK_KINDS.contains(&kind))
        })
        .collect();

    if json {
        let mut pipeline_map = Map::new();
        for (name, steps) in &pipelines {
            pipeline_map.insert(name.clone(), json!(steps));
        }
        let mut task_map = Map::new();
        for (kind, targets, _) in &kinds {
            task_map.insert(kind.clone(), json!(targets));
        }
        let output = json!({
            "pipelines": Value::Object(pipeline_map),
            "tasks": Value::Object(task_map),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_section_header("Pipelines", SectionStyle::Primary);
    if pipelines.is_empty() {
        print_warning("No pipelines defined");
        println!();
    } else {
        print_pipeline_table(&pipelines);
        println!();
    }

    print_section_header("Tasks", SectionStyle::Primary);
    print_task_table(&kinds);
    println!();

    Ok(())
}

pub fn cmd_plan(
    root: PathBuf,
    config: Option<PathBuf>,
    tasks: Vec<String>,
    json: bool,
) -> Result<()> {
    let project = load_project(&root, config.as_ref())?;
    let runner = project.into_runner(create_step, NullReporter);
    let plan = runner.plan(&tasks)?;

    let steps: Vec<(String, String)> = plan
        .steps
        .iter()
        .map(|planned| (planned.task.to_string(), planned.describe()))
        .collect();

    if json {
        let output: Vec<Value> = steps
            .iter()
            .map(|(task, description)| json!({ "task": task, "description": description }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_section_header("Plan", SectionStyle::Primary);
    print_key_value("Tasks", &tasks.join(", "));
    print_key_value("Steps", &steps.len().to_string());
    println!();
    print_plan_table(&steps);
    println!();

    Ok(())
}

pub fn cmd_check(root: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let project = load_project(&root, config.as_ref())?;
    print_section_header("Check", SectionStyle::Primary);
    print_key_value(
        "Project",
        &format!(
            "{} {}",
            project.metadata.info.name, project.metadata.info.version
        ),
    );
    println!();

    let unsupported: Vec<String> = project
        .config
        .task_kinds()
        .into_iter()
        .filter(|kind| !TASK_KINDS.contains(kind))
        .map(str::to_string)
        .collect();
    let pipelines: Vec<String> = project.config.pipelines().keys().cloned().collect();

    let runner = project.into_runner(create_step, NullReporter);
    let rows = check_pipelines(&runner, &pipelines);
    print_check_table(&rows);
    println!();

    if !unsupported.is_empty() {
        print_section_header("Warnings", SectionStyle::Warning);
    }
    for kind in &unsupported {
        print_warning(&format!(
            "Task '{}' has no step implementation and can only be listed",
            kind
        ));
    }

    let failures = rows.iter().filter(|(_, outcome)| outcome.is_err()).count();
    if failures > 0 {
        print_error(&format!("{} of {} pipelines failed to resolve", failures, rows.len()));
        std::process::exit(1);
    }

    print_success("All pipelines resolve");
    Ok(())
}

fn check_pipelines(runner: &TaskRunner, pipelines: &[String]) -> Vec<(String, Result<usize, String>)> {
    pipelines
        .iter()
        .map(|name| {
            let outcome = runner
                .plan(std::slice::from_ref(name))
                .map(|plan| plan.len())
                .map_err(|e| e.to_string());
            (name.clone(), outcome)
        })
        .collect()
}
