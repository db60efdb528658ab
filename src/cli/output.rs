use serde::Serialize;

use crate::model::project::Project;
use crate::model::task::Task;
use crate::ops::task_ops;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    /// 1-based position within the project
    pub number: usize,
    pub description: String,
    pub done: bool,
}

#[derive(Serialize)]
pub struct ProjectTasksJson {
    pub project: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct ProjectInfoJson {
    pub name: String,
    pub file: String,
    pub done: usize,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(number: usize, task: &Task) -> TaskJson {
    TaskJson {
        number,
        description: task.description.clone(),
        done: task.is_done,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn checkbox(task: &Task) -> &'static str {
    if task.is_done { "[x]" } else { "[ ]" }
}

/// Format a single task as a numbered one-line summary
pub fn format_task_line(number: usize, task: &Task) -> String {
    format!("{:>3}  {} {}", number, checkbox(task), task.description)
}

/// Format a project listing header
pub fn format_project_header(project: &Project) -> String {
    format!(
        "== {} ({}/{}) ==",
        project.name(),
        task_ops::done_count(&project.tasks),
        project.tasks.len()
    )
}

/// Format project info for the projects listing
pub fn format_project_info(project: &Project, file: &str) -> String {
    format!(
        "  {}  {}/{} done  ({})",
        project.name(),
        task_ops::done_count(&project.tasks),
        project.tasks.len(),
        file
    )
}
