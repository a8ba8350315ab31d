//! CLI formatting utilities.
//!
//! One place for colours, symbols and table styles so every command prints
//! with the same visual hierarchy.

mod headers;
mod output;
mod progress;
mod status;
mod tables;

pub use headers::{print_section_header, SectionStyle};
pub use output::{format_duration, print_key_value, print_separator_with_spacing, print_summary_box};
pub use progress::create_step_progress;
pub use status::{print_error, print_success, print_warning, Mark};
pub use tables::{print_check_table, print_pipeline_table, print_plan_table, print_task_table};
