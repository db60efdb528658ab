use crate::model::task::{Task, TaskId};

/// Error type for task operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

/// Position of the task with `id` in the list
pub fn position_of(tasks: &[Task], id: TaskId) -> Option<usize> {
    tasks.iter().position(|t| t.id() == id)
}

fn find_mut(tasks: &mut [Task], id: TaskId) -> Result<&mut Task, TaskError> {
    tasks
        .iter_mut()
        .find(|t| t.id() == id)
        .ok_or(TaskError::NotFound(id))
}

/// Append a new open task. Returns its id.
pub fn add_task(tasks: &mut Vec<Task>, description: String) -> TaskId {
    let task = Task::new(description);
    let id = task.id();
    tasks.push(task);
    id
}

/// Replace a task's description in place
pub fn edit_description(
    tasks: &mut [Task],
    id: TaskId,
    description: String,
) -> Result<(), TaskError> {
    find_mut(tasks, id)?.description = description;
    Ok(())
}

/// Flip the completion flag. Returns the new value.
pub fn toggle_done(tasks: &mut [Task], id: TaskId) -> Result<bool, TaskError> {
    let task = find_mut(tasks, id)?;
    task.is_done = !task.is_done;
    Ok(task.is_done)
}

pub fn set_done(tasks: &mut [Task], id: TaskId, done: bool) -> Result<(), TaskError> {
    find_mut(tasks, id)?.is_done = done;
    Ok(())
}

/// Remove a task, returning it with its former position
pub fn remove_task(tasks: &mut Vec<Task>, id: TaskId) -> Result<(usize, Task), TaskError> {
    let idx = position_of(tasks, id).ok_or(TaskError::NotFound(id))?;
    Ok((idx, tasks.remove(idx)))
}

pub fn done_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| t.is_done).count()
}
