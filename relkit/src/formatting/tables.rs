//! Table formatting utilities using comfy-table.

use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;

use super::Mark;

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(*h).add_attribute(comfy_table::Attribute::Bold))
                .collect::<Vec<_>>(),
        )
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    table
}

/// Prints pipelines with the tasks they run, in order.
pub fn print_pipeline_table(pipelines: &[(String, Vec<String>)]) {
    let mut table = styled_table(&["Pipeline", "Steps"]);
    for (name, steps) in pipelines {
        table.add_row(vec![
            Cell::new(name).fg(comfy_table::Color::Cyan),
            Cell::new(steps.join(" → ")),
        ]);
    }
    println!("{}", table);
}

/// Prints task kinds with their targets.
pub fn print_task_table(kinds: &[(String, Vec<String>, bool)]) {
    let mut table = styled_table(&["Task", "Targets"]);
    for (kind, targets, supported) in kinds {
        let kind_cell = if *supported {
            Cell::new(kind).fg(comfy_table::Color::White)
        } else {
            Cell::new(format!("{} (unsupported)", kind)).fg(comfy_table::Color::DarkGrey)
        };
        let targets_str = if targets.is_empty() {
            "(no targets)".bright_black().to_string()
        } else {
            targets.join(", ")
        };
        table.add_row(vec![kind_cell, Cell::new(targets_str)]);
    }
    println!("{}", table);
}

/// Prints the resolved steps of a plan.
pub fn print_plan_table(steps: &[(String, String)]) {
    let mut table = styled_table(&["#", "Task", "Action"]);
    for (index, (task, description)) in steps.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1).fg(comfy_table::Color::DarkGrey),
            Cell::new(task).fg(comfy_table::Color::White),
            Cell::new(description),
        ]);
    }
    println!("{}", table);
}

/// Prints the outcome of resolving each pipeline.
pub fn print_check_table(rows: &[(String, Result<usize, String>)]) {
    let mut table = styled_table(&["Status", "Pipeline", "Details"]);
    for (name, outcome) in rows {
        match outcome {
            Ok(steps) => table.add_row(vec![
                Cell::new(Mark::Done.glyph()).fg(comfy_table::Color::Green),
                Cell::new(name).fg(comfy_table::Color::White),
                Cell::new(format!("{} steps", steps)),
            ]),
            Err(message) => table.add_row(vec![
                Cell::new(Mark::Failed.glyph()).fg(comfy_table::Color::Red),
                Cell::new(name).fg(comfy_table::Color::Red),
                Cell::new(message).fg(comfy_table::Color::Red),
            ]),
        };
    }
    println!("{}", table);
}
