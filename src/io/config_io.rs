use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::{ProjectConfig, TodoConfig};

/// Name of the optional config file in the data directory
pub const CONFIG_FILE: &str = "todo.toml";

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse todo.toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not edit todo.toml: {0}")]
    Edit(#[from] toml_edit::TomlError),
    #[error("duplicate project name: {0}")]
    DuplicateProject(String),
    #[error("duplicate project file: {0}")]
    DuplicateFile(String),
}

/// Read `todo.toml` from `root`, falling back to defaults when it is absent.
pub fn read_config(root: &Path) -> Result<TodoConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        tracing::debug!(root = %root.display(), "no todo.toml, using defaults");
        return Ok(TodoConfig::default());
    }
    let text = fs::read_to_string(&config_path).map_err(|e| ConfigError::Read {
        path: config_path.clone(),
        source: e,
    })?;
    let config: TodoConfig = toml::from_str(&text)?;
    check_projects(root, &config.projects)?;
    Ok(config)
}

/// Each project needs its own name and its own file under `root`.
pub fn check_projects(root: &Path, projects: &[ProjectConfig]) -> Result<(), ConfigError> {
    for (i, p) in projects.iter().enumerate() {
        if projects[..i].iter().any(|q| q.name == p.name) {
            return Err(ConfigError::DuplicateProject(p.name.clone()));
        }
        let path = root.join(&p.file);
        if projects[..i].iter().any(|q| root.join(&q.file) == path) {
            return Err(ConfigError::DuplicateFile(p.file.clone()));
        }
    }
    Ok(())
}

/// Read the raw config document for format-preserving edits.
/// A missing file yields a document listing the default project, so that
/// adding a project never hides the implicit one.
pub fn read_config_doc(root: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        let mut doc = toml_edit::DocumentMut::new();
        add_project_to_config(&mut doc, &ProjectConfig::default());
        return Ok(doc);
    }
    let text = fs::read_to_string(&config_path).map_err(|e| ConfigError::Read {
        path: config_path.clone(),
        source: e,
    })?;
    let mut doc: toml_edit::DocumentMut = text.parse()?;
    // Mirror the implicit default when an existing file lists no projects
    if doc.get("projects").is_none() {
        add_project_to_config(&mut doc, &ProjectConfig::default());
    }
    Ok(doc)
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(root: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    crate::io::store::atomic_write(&config_path, doc.to_string().as_bytes()).map_err(|e| {
        ConfigError::Write {
            path: config_path,
            source: e,
        }
    })
}

/// Append a `[[projects]]` table to the config document
pub fn add_project_to_config(doc: &mut toml_edit::DocumentMut, project: &ProjectConfig) {
    if !doc.contains_key("projects") {
        doc["projects"] = toml_edit::Item::ArrayOfTables(toml_edit::ArrayOfTables::new());
    }

    if let Some(projects) = doc["projects"].as_array_of_tables_mut() {
        let mut table = toml_edit::Table::new();
        table["name"] = toml_edit::value(&project.name);
        table["file"] = toml_edit::value(&project.file);
        projects.push(table);
    }
}

/// Register a new project in `root/todo.toml`, creating the file if needed.
pub fn register_project(root: &Path, project: &ProjectConfig) -> Result<(), ConfigError> {
    let mut doc = read_config_doc(root)?;
    let mut projects = toml::from_str::<TodoConfig>(&doc.to_string())?.projects;
    projects.push(project.clone());
    check_projects(root, &projects)?;
    add_project_to_config(&mut doc, project);
    write_config(root, &doc)?;
    tracing::info!(name = %project.name, file = %project.file, "registered project");
    Ok(())
}

/// Derive a file name for a project: lowercase ASCII alphanumerics joined by `-`.
pub fn project_file_name(name: &str) -> String {
    let mut slug = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "project.json".to_string()
    } else {
        format!("{}.json", slug)
    }
}
