use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default project used when `todo.toml` is absent or lists no projects
pub const DEFAULT_PROJECT_NAME: &str = "Tasks";
/// File backing the default project, relative to the data directory
pub const DEFAULT_PROJECT_FILE: &str = "tasks.json";

/// Configuration from todo.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoConfig {
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
    #[serde(default)]
    pub ui: UiConfig,
}

impl TodoConfig {
    /// Configured projects, or the single default project if none are listed
    pub fn effective_projects(&self) -> Vec<ProjectConfig> {
        if self.projects.is_empty() {
            vec![ProjectConfig::default()]
        } else {
            self.projects.clone()
        }
    }
}

/// When the session writes dirty projects to disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaveTiming {
    /// Save the affected project after every accepted command
    #[default]
    EveryMutation,
    /// Save dirty projects only when the session closes
    OnExit,
    /// Keep everything in memory
    Never,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default)]
    pub save: SaveTiming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub file: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            name: DEFAULT_PROJECT_NAME.to_string(),
            file: DEFAULT_PROJECT_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Color overrides keyed by theme slot (e.g. `highlight = "#FB4196"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
