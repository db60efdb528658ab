use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "todo", about = concat!("[x] todo v", env!("CARGO_PKG_VERSION"), " - a to-do list that stays put"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory (default: current directory)
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks (all projects, or one)
    List(ListArgs),
    /// Add a task to the end of a project
    Add(AddArgs),
    /// Replace a task's description
    Edit(EditArgs),
    /// Flip a task between open and done
    Toggle(TaskRef),
    /// Mark a task done
    Done(TaskRef),
    /// Mark a task open again
    Undone(TaskRef),
    /// Remove a task
    Rm(TaskRef),
    /// List projects, or register a new one
    Projects(ProjectsCmd),
}

#[derive(Args)]
pub struct ListArgs {
    /// Project to list (default: all)
    pub project: Option<String>,
    /// Only tasks whose description matches this regex (case-insensitive)
    #[arg(long)]
    pub grep: Option<String>,
    /// Only completed tasks
    #[arg(long, conflicts_with = "open")]
    pub done: bool,
    /// Only open tasks
    #[arg(long)]
    pub open: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task description
    pub text: String,
    /// Project to add to (default: first project)
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task number as shown by `todo list`
    pub number: usize,
    /// New description
    pub text: String,
    /// Project holding the task (default: first project)
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Args)]
pub struct TaskRef {
    /// Task number as shown by `todo list`
    pub number: usize,
    /// Project holding the task (default: first project)
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Args)]
pub struct ProjectsCmd {
    #[command(subcommand)]
    pub action: Option<ProjectsAction>,
}

#[derive(Subcommand)]
pub enum ProjectsAction {
    /// Register a new project in todo.toml
    Add(ProjectAddArgs),
}

#[derive(Args)]
pub struct ProjectAddArgs {
    /// Project name
    pub name: String,
    /// JSON file for the project (default: derived from the name)
    #[arg(long)]
    pub file: Option<String>,
}
