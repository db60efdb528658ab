mod projects;
pub use projects::{cmd_projects, cmd_projects_add};

use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::model::task::TaskId;
use crate::ops::filter;
use crate::ops::session::{Applied, Command, Session, SessionError};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cmd: Commands, json: bool, root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        // Read commands
        Commands::List(args) => cmd_list(args, root, json),
        Commands::Projects(args) => match args.action {
            None => cmd_projects(root, json),
            Some(ProjectsAction::Add(add)) => cmd_projects_add(add, root),
        },

        // Write commands
        Commands::Add(args) => cmd_add(args, root),
        Commands::Edit(args) => cmd_edit(args, root),
        Commands::Toggle(args) => cmd_set(args, None, root),
        Commands::Done(args) => cmd_set(args, Some(true), root),
        Commands::Undone(args) => cmd_set(args, Some(false), root),
        Commands::Rm(args) => cmd_rm(args, root),
    }
}

/// Resolve the data directory from `-C` (or the current directory).
pub fn data_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e).into()),
        None => Ok(std::env::current_dir()?),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Index of the named project, or the first project when no name is given
fn project_index(session: &Session, name: Option<&str>) -> Result<usize, SessionError> {
    match name {
        Some(name) => session
            .workspace()
            .project_index(name)
            .ok_or_else(|| SessionError::ProjectNotFound(name.to_string())),
        None => Ok(0),
    }
}

/// Map a 1-based task number in a project to the task's id
fn resolve_task(
    session: &Session,
    project: Option<&str>,
    number: usize,
) -> Result<TaskId, Box<dyn std::error::Error>> {
    let idx = project_index(session, project)?;
    let p = &session.projects()[idx];
    number
        .checked_sub(1)
        .and_then(|i| p.tasks.get(i))
        .map(|t| t.id())
        .ok_or_else(|| format!("no task {} in {}", number, p.name()).into())
}

/// Run a command, then flush per the session's save timing
fn apply_and_close(
    session: &mut Session,
    cmd: Command,
) -> Result<Applied, Box<dyn std::error::Error>> {
    let applied = session.apply(cmd)?;
    session.close()?;
    Ok(applied)
}

/// 1-based display number of a task after a mutation
fn number_of(session: &Session, id: TaskId) -> Option<usize> {
    let idx = session.workspace().owner_of(id)?;
    crate::ops::task_ops::position_of(&session.projects()[idx].tasks, id).map(|i| i + 1)
}

fn print_task(session: &Session, id: TaskId) {
    if let (Some(n), Some(task)) = (number_of(session, id), session.workspace().task(id)) {
        println!("{}", format_task_line(n, task));
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, root: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open_dir(root)?;
    let matcher = args.grep.as_deref().and_then(filter::build_matcher);

    let selected: Vec<usize> = match args.project.as_deref() {
        Some(name) => vec![project_index(&session, Some(name))?],
        None => (0..session.projects().len()).collect(),
    };

    let wanted = |done: bool| !(args.done && !done) && !(args.open && done);

    if json {
        let mut results = Vec::new();
        for idx in selected {
            let project = &session.projects()[idx];
            let tasks = filter::matching_positions(&project.tasks, matcher.as_ref())
                .into_iter()
                .filter(|&i| wanted(project.tasks[i].is_done))
                .map(|i| task_to_json(i + 1, &project.tasks[i]))
                .collect();
            results.push(ProjectTasksJson {
                project: project.name().to_string(),
                tasks,
            });
        }
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        let mut first = true;
        for idx in selected {
            let project = &session.projects()[idx];
            if !first {
                println!();
            }
            first = false;
            println!("{}", format_project_header(project));
            for i in filter::matching_positions(&project.tasks, matcher.as_ref()) {
                let task = &project.tasks[i];
                if wanted(task.is_done) {
                    println!("{}", format_task_line(i + 1, task));
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if args.text.trim().is_empty() {
        return Err("task description is empty".into());
    }
    let mut session = Session::open_dir(root)?;
    let idx = project_index(&session, args.project.as_deref())?;
    let project = session.projects()[idx].name().to_string();
    let applied = apply_and_close(
        &mut session,
        Command::AddTask {
            project,
            description: args.text,
        },
    )?;
    if let Applied::Added(id) = applied {
        print_task(&session, id);
    }
    Ok(())
}

fn cmd_edit(args: EditArgs, root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if args.text.trim().is_empty() {
        return Err("task description is empty".into());
    }
    let mut session = Session::open_dir(root)?;
    let id = resolve_task(&session, args.project.as_deref(), args.number)?;
    apply_and_close(
        &mut session,
        Command::EditTask {
            id,
            description: args.text,
        },
    )?;
    print_task(&session, id);
    Ok(())
}

/// Toggle when `done` is `None`, otherwise set the flag
fn cmd_set(args: TaskRef, done: Option<bool>, root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open_dir(root)?;
    let id = resolve_task(&session, args.project.as_deref(), args.number)?;
    let cmd = match done {
        Some(done) => Command::SetDone { id, done },
        None => Command::ToggleTask { id },
    };
    apply_and_close(&mut session, cmd)?;
    print_task(&session, id);
    Ok(())
}

fn cmd_rm(args: TaskRef, root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open_dir(root)?;
    let id = resolve_task(&session, args.project.as_deref(), args.number)?;
    if let Applied::Removed { task, .. } = apply_and_close(&mut session, Command::RemoveTask { id })? {
        println!("removed: {}", task.description);
    }
    Ok(())
}
