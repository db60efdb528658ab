use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque in-memory task identity.
///
/// Assigned when a task is created or loaded and never written to disk, so
/// ids are only meaningful within the current process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    /// Allocate an id that no other task in this process has.
    pub fn fresh() -> Self {
        TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single to-do entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(skip, default = "TaskId::fresh")]
    id: TaskId,
    /// What needs doing
    pub description: String,
    /// Whether the task has been checked off
    #[serde(rename = "isDone", default)]
    pub is_done: bool,
}

impl Task {
    /// Create an open task with a fresh id
    pub fn new(description: impl Into<String>) -> Self {
        Task {
            id: TaskId::fresh(),
            description: description.into(),
            is_done: false,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description && self.is_done == other.is_done
    }
}

impl Eq for Task {}
