use std::path::Path;

use crate::cli::commands::ProjectAddArgs;
use crate::cli::output::{ProjectInfoJson, format_project_info};
use crate::io::config_io;
use crate::model::config::ProjectConfig;
use crate::ops::session::Session;
use crate::ops::task_ops;

/// List projects with their completion counts
pub fn cmd_projects(root: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_io::read_config(root)?;
    let session = Session::open(root, &config)?;
    let configs = config.effective_projects();

    if json {
        let infos: Vec<ProjectInfoJson> = session
            .projects()
            .iter()
            .zip(&configs)
            .map(|(p, pc)| ProjectInfoJson {
                name: p.name().to_string(),
                file: pc.file.clone(),
                done: task_ops::done_count(&p.tasks),
                total: p.tasks.len(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
    } else {
        for (p, pc) in session.projects().iter().zip(&configs) {
            println!("{}", format_project_info(p, &pc.file));
        }
    }
    Ok(())
}

/// Register a new, empty project in todo.toml
pub fn cmd_projects_add(args: ProjectAddArgs, root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err("project name is empty".into());
    }
    let file = args
        .file
        .unwrap_or_else(|| config_io::project_file_name(name));
    config_io::register_project(
        root,
        &ProjectConfig {
            name: name.to_string(),
            file: file.clone(),
        },
    )?;
    println!("added project {} ({})", name, file);
    Ok(())
}
