use std::path::Path;

use crate::io::config_io::{self, ConfigError};
use crate::io::store::{StoreError, TaskStore};
use crate::model::config::{SaveTiming, TodoConfig};
use crate::model::project::{Project, Workspace};
use crate::model::task::{Task, TaskId};
use crate::ops::task_ops::{self, TaskError};

/// Error type for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A mutation requested by a front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddTask { project: String, description: String },
    EditTask { id: TaskId, description: String },
    ToggleTask { id: TaskId },
    SetDone { id: TaskId, done: bool },
    RemoveTask { id: TaskId },
}

/// What an accepted command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Added(TaskId),
    Edited(TaskId),
    Completion { id: TaskId, done: bool },
    Removed { id: TaskId, index: usize, task: Task },
}

/// Owns the in-memory workspace and routes every mutation through the
/// persistence gateway according to the configured [`SaveTiming`].
#[derive(Debug)]
pub struct Session {
    timing: SaveTiming,
    workspace: Workspace,
    stores: Vec<TaskStore>,
    dirty: Vec<bool>,
}

impl Session {
    /// Read `todo.toml` in `root` (if any) and load every project.
    pub fn open_dir(root: &Path) -> Result<Self, SessionError> {
        let config = config_io::read_config(root)?;
        Session::open(root, &config)
    }

    /// Load every configured project from its file under `root`.
    pub fn open(root: &Path, config: &TodoConfig) -> Result<Self, SessionError> {
        let configs = config.effective_projects();
        config_io::check_projects(root, &configs)?;
        let mut projects = Vec::new();
        let mut stores = Vec::new();
        for pc in configs {
            let store = TaskStore::new(root.join(&pc.file));
            let tasks = store.load()?;
            projects.push(Project::with_tasks(pc.name, tasks));
            stores.push(store);
        }
        tracing::info!(
            root = %root.display(),
            projects = projects.len(),
            timing = ?config.persistence.save,
            "session opened"
        );
        let dirty = vec![false; projects.len()];
        Ok(Session {
            timing: config.persistence.save,
            workspace: Workspace { projects },
            stores,
            dirty,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn projects(&self) -> &[Project] {
        &self.workspace.projects
    }

    /// Whether the project has changes not yet written
    pub fn is_dirty(&self, project: usize) -> bool {
        self.dirty.get(project).copied().unwrap_or(false)
    }

    /// Apply a command to the in-memory workspace, then persist the owning
    /// project if saving on every mutation.
    pub fn apply(&mut self, cmd: Command) -> Result<Applied, SessionError> {
        let (project, applied) = match cmd {
            Command::AddTask {
                project,
                description,
            } => {
                let idx = self
                    .workspace
                    .project_index(&project)
                    .ok_or(SessionError::ProjectNotFound(project))?;
                let tasks = &mut self.workspace.projects[idx].tasks;
                (idx, Applied::Added(task_ops::add_task(tasks, description)))
            }
            Command::EditTask { id, description } => {
                let idx = self.owner_of(id)?;
                task_ops::edit_description(
                    &mut self.workspace.projects[idx].tasks,
                    id,
                    description,
                )?;
                (idx, Applied::Edited(id))
            }
            Command::ToggleTask { id } => {
                let idx = self.owner_of(id)?;
                let done = task_ops::toggle_done(&mut self.workspace.projects[idx].tasks, id)?;
                (idx, Applied::Completion { id, done })
            }
            Command::SetDone { id, done } => {
                let idx = self.owner_of(id)?;
                task_ops::set_done(&mut self.workspace.projects[idx].tasks, id, done)?;
                (idx, Applied::Completion { id, done })
            }
            Command::RemoveTask { id } => {
                let idx = self.owner_of(id)?;
                let (index, task) =
                    task_ops::remove_task(&mut self.workspace.projects[idx].tasks, id)?;
                (idx, Applied::Removed { id, index, task })
            }
        };

        self.dirty[project] = true;
        tracing::debug!(project = self.workspace.projects[project].name(), ?applied, "applied");

        if self.timing == SaveTiming::EveryMutation {
            self.save_project(project)?;
        }
        Ok(applied)
    }

    fn owner_of(&self, id: TaskId) -> Result<usize, SessionError> {
        self.workspace
            .owner_of(id)
            .ok_or(SessionError::Task(TaskError::NotFound(id)))
    }

    fn save_project(&mut self, project: usize) -> Result<(), SessionError> {
        self.stores[project].save(&self.workspace.projects[project].tasks)?;
        self.dirty[project] = false;
        Ok(())
    }

    /// Write every dirty project regardless of save timing
    pub fn save_all(&mut self) -> Result<(), SessionError> {
        for project in 0..self.workspace.projects.len() {
            if self.dirty[project] {
                self.save_project(project)?;
            }
        }
        Ok(())
    }

    /// End of session: flush pending changes unless saving is disabled.
    pub fn close(&mut self) -> Result<(), SessionError> {
        match self.timing {
            SaveTiming::EveryMutation | SaveTiming::OnExit => self.save_all(),
            SaveTiming::Never => {
                if self.dirty.iter().any(|d| *d) {
                    tracing::warn!("save timing is \"never\"; discarding in-memory changes");
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{PersistenceConfig, ProjectConfig};
    use std::fs;
    use tempfile::TempDir;

    fn config(timing: SaveTiming) -> TodoConfig {
        TodoConfig {
            persistence: PersistenceConfig { save: timing },
            ..Default::default()
        }
    }

    fn add(session: &mut Session, description: &str) -> TaskId {
        match session
            .apply(Command::AddTask {
                project: "Tasks".into(),
                description: description.into(),
            })
            .unwrap()
        {
            Applied::Added(id) => id,
            other => panic!("unexpected {:?}", other),
        }
    }

    fn file_text(tmp: &TempDir) -> String {
        fs::read_to_string(tmp.path().join("tasks.json")).unwrap()
    }

    #[test]
    fn fresh_directory_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let session = Session::open_dir(tmp.path()).unwrap();
        assert_eq!(session.projects().len(), 1);
        assert_eq!(session.projects()[0].name(), "Tasks");
        assert!(session.projects()[0].tasks.is_empty());
        assert!(!tmp.path().join("tasks.json").exists());
    }

    #[test]
    fn add_saves_immediately() {
        let tmp = TempDir::new().unwrap();
        let mut session = Session::open(tmp.path(), &config(SaveTiming::EveryMutation)).unwrap();
        add(&mut session, "Buy milk");
        assert_eq!(
            file_text(&tmp),
            r#"[{"description":"Buy milk","isDone":false}]"#
        );
        assert!(!session.is_dirty(0));
    }

    #[test]
    fn toggle_second_of_two_then_reload() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("tasks.json"),
            r#"[{"description":"First","isDone":false},{"description":"Second","isDone":false}]"#,
        )
        .unwrap();

        let mut session = Session::open_dir(tmp.path()).unwrap();
        let second = session.projects()[0].tasks[1].id();
        let applied = session.apply(Command::ToggleTask { id: second }).unwrap();
        assert_eq!(applied, Applied::Completion { id: second, done: true });

        let reloaded = Session::open_dir(tmp.path()).unwrap();
        let tasks = &reloaded.projects()[0].tasks;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].description, "First");
        assert!(!tasks[0].is_done);
        assert_eq!(tasks[1].description, "Second");
        assert!(tasks[1].is_done);
    }

    #[test]
    fn removing_only_task_persists_empty_list() {
        let tmp = TempDir::new().unwrap();
        let mut session = Session::open_dir(tmp.path()).unwrap();
        let id = add(&mut session, "Only");
        let applied = session.apply(Command::RemoveTask { id }).unwrap();
        assert!(matches!(applied, Applied::Removed { index: 0, .. }));
        assert_eq!(file_text(&tmp), "[]");
        assert!(Session::open_dir(tmp.path()).unwrap().projects()[0].tasks.is_empty());
    }

    #[test]
    fn edit_keeps_neighbours() {
        let tmp = TempDir::new().unwrap();
        let mut session = Session::open_dir(tmp.path()).unwrap();
        add(&mut session, "a");
        let b = add(&mut session, "b");
        add(&mut session, "c");
        session
            .apply(Command::EditTask {
                id: b,
                description: "B".into(),
            })
            .unwrap();
        assert_eq!(
            file_text(&tmp),
            r#"[{"description":"a","isDone":false},{"description":"B","isDone":false},{"description":"c","isDone":false}]"#
        );
    }

    #[test]
    fn on_exit_defers_until_close() {
        let tmp = TempDir::new().unwrap();
        let mut session = Session::open(tmp.path(), &config(SaveTiming::OnExit)).unwrap();
        add(&mut session, "Buy milk");
        assert!(!tmp.path().join("tasks.json").exists());
        assert!(session.is_dirty(0));

        session.close().unwrap();
        assert_eq!(
            file_text(&tmp),
            r#"[{"description":"Buy milk","isDone":false}]"#
        );
        assert!(!session.is_dirty(0));
    }

    #[test]
    fn never_does_not_write() {
        let tmp = TempDir::new().unwrap();
        let mut session = Session::open(tmp.path(), &config(SaveTiming::Never)).unwrap();
        add(&mut session, "Ephemeral");
        session.close().unwrap();
        assert!(!tmp.path().join("tasks.json").exists());

        // Explicit save still works
        session.save_all().unwrap();
        assert!(tmp.path().join("tasks.json").exists());
    }

    #[test]
    fn unknown_project_and_task_are_errors() {
        let tmp = TempDir::new().unwrap();
        let mut session = Session::open_dir(tmp.path()).unwrap();
        let err = session
            .apply(Command::AddTask {
                project: "Nope".into(),
                description: "x".into(),
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::ProjectNotFound(name) if name == "Nope"));

        let stray = TaskId::fresh();
        let err = session.apply(Command::RemoveTask { id: stray }).unwrap_err();
        assert!(matches!(err, SessionError::Task(TaskError::NotFound(id)) if id == stray));
        assert!(!session.is_dirty(0));
        assert!(!tmp.path().join("tasks.json").exists());
    }

    #[test]
    fn projects_save_to_their_own_files() {
        let tmp = TempDir::new().unwrap();
        let config = TodoConfig {
            projects: vec![
                ProjectConfig {
                    name: "Home".into(),
                    file: "home.json".into(),
                },
                ProjectConfig {
                    name: "Work".into(),
                    file: "work.json".into(),
                },
            ],
            ..Default::default()
        };
        let mut session = Session::open(tmp.path(), &config).unwrap();
        session
            .apply(Command::AddTask {
                project: "Work".into(),
                description: "Report".into(),
            })
            .unwrap();

        assert!(!tmp.path().join("home.json").exists());
        assert_eq!(
            fs::read_to_string(tmp.path().join("work.json")).unwrap(),
            r#"[{"description":"Report","isDone":false}]"#
        );
        let id = session.projects()[1].tasks[0].id();
        session.apply(Command::SetDone { id, done: true }).unwrap();
        assert!(session.workspace().task(id).unwrap().is_done);
    }

    #[test]
    fn shared_project_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let config = TodoConfig {
            projects: vec![
                ProjectConfig {
                    name: "Home".into(),
                    file: "a.json".into(),
                },
                ProjectConfig {
                    name: "Work".into(),
                    file: "a.json".into(),
                },
            ],
            ..Default::default()
        };
        assert!(matches!(
            Session::open(tmp.path(), &config),
            Err(SessionError::Config(ConfigError::DuplicateFile(file))) if file == "a.json"
        ));
        assert!(!tmp.path().join("a.json").exists());
    }

    #[test]
    fn malformed_file_aborts_open() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("tasks.json"), "[{").unwrap();
        assert!(matches!(
            Session::open_dir(tmp.path()),
            Err(SessionError::Store(StoreError::Parse { .. }))
        ));
    }
}
