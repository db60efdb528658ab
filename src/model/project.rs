use super::task::{Task, TaskId};

/// A named, ordered group of tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
    /// Tasks in display order
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Project {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(name: impl Into<String>, tasks: Vec<Task>) -> Self {
        Project {
            name: name.into(),
            tasks,
        }
    }

    /// The project name is fixed at creation
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id() == id)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }
}

/// All projects loaded from one data directory, in configured order
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub projects: Vec<Project>,
}

impl Workspace {
    /// Index of the project with the given name
    pub fn project_index(&self, name: &str) -> Option<usize> {
        self.projects.iter().position(|p| p.name() == name)
    }

    /// Index of the project that owns the task
    pub fn owner_of(&self, id: TaskId) -> Option<usize> {
        self.projects.iter().position(|p| p.contains(id))
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.projects.iter().find_map(|p| p.task(id))
    }
}
