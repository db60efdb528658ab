use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::config::DEFAULT_PROJECT_FILE;
use crate::model::task::Task;

/// Error type for task file I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Load/save boundary between one project's tasks and its JSON snapshot.
///
/// Every save rewrites the whole file as a JSON array of
/// `{"description": .., "isDone": ..}` records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    /// `tasks.json` in the working directory
    pub fn default_path() -> Self {
        TaskStore::new(DEFAULT_PROJECT_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with a snapshot of `tasks`.
    pub fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let content = serde_json::to_string(tasks)?;
        atomic_write(&self.path, content.as_bytes()).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %self.path.display(), tasks = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Read the snapshot back. A missing file is an empty list.
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no task file, starting empty");
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        let tasks: Vec<Task> = serde_json::from_str(&text).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %self.path.display(), tasks = tasks.len(), "loaded tasks");
        Ok(tasks)
    }
}

/// Write `content` to `path` via a temp file in the same directory + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    // The temp file starts out private; keep the mode of the file it replaces
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
