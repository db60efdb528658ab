use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::io::config_io;
use crate::model::config::UiConfig;
use crate::model::project::Project;
use crate::model::task::TaskId;
use crate::ops::filter;
use crate::ops::session::{Applied, Command, Session, SessionError};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task
    Insert,
    /// Rewriting the description of `App::edit_target`
    Edit,
    /// Typing a filter pattern
    Filter,
}

/// Main application state
pub struct App {
    pub session: Session,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Index of the project shown in the list
    pub active_project: usize,
    /// Selected task per project. Tracked by id so it survives
    /// filtering, removal and reordering.
    pub selection: Vec<Option<TaskId>>,
    /// Task being edited in Edit mode
    pub edit_target: Option<TaskId>,
    /// Text input buffer (Insert/Edit/Filter)
    pub input: String,
    /// Byte offset of the cursor in `input`
    pub input_cursor: usize,
    /// Active filter pattern, if any
    pub filter: Option<String>,
    /// First visible list row
    pub scroll_offset: usize,
}

impl App {
    pub fn new(session: Session, ui: &UiConfig) -> Self {
        let selection = session
            .projects()
            .iter()
            .map(|p| p.tasks.first().map(|t| t.id()))
            .collect();
        App {
            session,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(ui),
            show_key_hints: ui.show_key_hints,
            active_project: 0,
            selection,
            edit_target: None,
            input: String::new(),
            input_cursor: 0,
            filter: None,
            scroll_offset: 0,
        }
    }

    pub fn current_project(&self) -> &Project {
        &self.session.projects()[self.active_project]
    }

    pub fn filter_re(&self) -> Option<Regex> {
        self.filter.as_deref().and_then(filter::build_matcher)
    }

    /// Ids of the tasks shown in the list, in order
    pub fn visible_ids(&self) -> Vec<TaskId> {
        let tasks = &self.current_project().tasks;
        filter::matching_positions(tasks, self.filter_re().as_ref())
            .into_iter()
            .map(|i| tasks[i].id())
            .collect()
    }

    /// The selected task, if it is currently visible
    pub fn selected(&self) -> Option<TaskId> {
        let id = self.selection[self.active_project]?;
        self.visible_ids().contains(&id).then_some(id)
    }

    /// Row of the selected task within the visible list
    pub fn cursor_row(&self) -> Option<usize> {
        let id = self.selection[self.active_project]?;
        self.visible_ids().iter().position(|v| *v == id)
    }

    fn select(&mut self, id: Option<TaskId>) {
        self.selection[self.active_project] = id;
    }

    /// Keep the selection on a visible task, falling back to the first row
    pub fn normalize_selection(&mut self) {
        if self.selected().is_none() {
            let first = self.visible_ids().first().copied();
            self.select(first);
        }
    }

    /// Move the selection by `delta` rows, clamped to the list
    pub fn move_selection(&mut self, delta: isize) {
        let ids = self.visible_ids();
        if ids.is_empty() {
            return;
        }
        let row = self.cursor_row().unwrap_or(0) as isize;
        let target = (row + delta).clamp(0, ids.len() as isize - 1) as usize;
        self.select(Some(ids[target]));
    }

    pub fn select_first(&mut self) {
        let first = self.visible_ids().first().copied();
        self.select(first);
    }

    pub fn select_last(&mut self) {
        let last = self.visible_ids().last().copied();
        self.select(last);
    }

    /// Switch to the next/previous project, wrapping around
    pub fn switch_project(&mut self, delta: isize) {
        let count = self.session.projects().len() as isize;
        self.active_project = (self.active_project as isize + delta).rem_euclid(count) as usize;
        self.scroll_offset = 0;
        self.normalize_selection();
    }

    fn begin_input(&mut self, mode: Mode, text: String) {
        self.input_cursor = text.len();
        self.input = text;
        self.mode = mode;
    }

    pub fn start_insert(&mut self) {
        self.begin_input(Mode::Insert, String::new());
    }

    pub fn start_edit(&mut self) {
        let Some(id) = self.selected() else {
            return;
        };
        let text = self
            .session
            .workspace()
            .task(id)
            .map(|t| t.description.clone())
            .unwrap_or_default();
        self.edit_target = Some(id);
        self.begin_input(Mode::Edit, text);
    }

    pub fn start_filter(&mut self) {
        let text = self.filter.clone().unwrap_or_default();
        self.begin_input(Mode::Filter, text);
    }

    /// Leave any input mode without applying it
    pub fn cancel_input(&mut self) {
        if self.mode == Mode::Filter {
            self.filter = None;
            self.normalize_selection();
        }
        self.mode = Mode::Navigate;
        self.edit_target = None;
        self.input.clear();
        self.input_cursor = 0;
    }

    /// Re-apply the filter from the input buffer while typing
    pub fn update_filter_from_input(&mut self) {
        self.filter = if self.input.is_empty() {
            None
        } else {
            Some(self.input.clone())
        };
        self.scroll_offset = 0;
        self.normalize_selection();
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.normalize_selection();
    }

    /// Apply the input buffer for the current mode.
    /// Blank text never reaches the session.
    pub fn submit_input(&mut self) -> Result<(), SessionError> {
        match self.mode {
            Mode::Insert => {
                if self.input.trim().is_empty() {
                    self.cancel_input();
                    return Ok(());
                }
                let description = std::mem::take(&mut self.input);
                self.input_cursor = 0;
                let project = self.current_project().name().to_string();
                if let Applied::Added(id) = self.session.apply(Command::AddTask {
                    project,
                    description,
                })? {
                    self.select(Some(id));
                    self.normalize_selection();
                }
                // Stay in Insert mode for the next entry
            }
            Mode::Edit => {
                let target = self.edit_target;
                let description = std::mem::take(&mut self.input);
                self.cancel_input();
                if let Some(id) = target
                    && !description.trim().is_empty()
                    && self
                        .session
                        .workspace()
                        .task(id)
                        .is_some_and(|t| t.description != description)
                {
                    self.session.apply(Command::EditTask { id, description })?;
                    self.normalize_selection();
                }
            }
            Mode::Filter => {
                self.mode = Mode::Navigate;
                self.input.clear();
                self.input_cursor = 0;
            }
            Mode::Navigate => {}
        }
        Ok(())
    }

    pub fn toggle_selected(&mut self) -> Result<(), SessionError> {
        if let Some(id) = self.selected() {
            self.session.apply(Command::ToggleTask { id })?;
            self.normalize_selection();
        }
        Ok(())
    }

    /// Remove the selected task and select its visible neighbour
    pub fn remove_selected(&mut self) -> Result<(), SessionError> {
        let Some(id) = self.selected() else {
            return Ok(());
        };
        let ids = self.visible_ids();
        let row = ids.iter().position(|v| *v == id).unwrap_or(0);
        let neighbour = ids.get(row + 1).or_else(|| row.checked_sub(1).and_then(|r| ids.get(r)));
        let next = neighbour.copied();

        self.session.apply(Command::RemoveTask { id })?;
        self.select(next);
        self.normalize_selection();
        Ok(())
    }
}

/// Run the TUI against the data directory `root`.
pub fn run(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_io::read_config(root)?;
    let session = Session::open(root, &config)?;
    let mut app = App::new(session, &config.ui);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    app.session.close()?;
    Ok(())
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key)?;
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{PersistenceConfig, SaveTiming, TodoConfig};
    use std::fs;
    use tempfile::TempDir;

    fn app_with(tmp: &TempDir, json: &str) -> App {
        fs::write(tmp.path().join("tasks.json"), json).unwrap();
        let session = Session::open_dir(tmp.path()).unwrap();
        App::new(session, &UiConfig::default())
    }

    fn descriptions(app: &App) -> Vec<String> {
        app.current_project()
            .tasks
            .iter()
            .map(|t| t.description.clone())
            .collect()
    }

    const THREE: &str = r#"[{"description":"Buy milk","isDone":false},{"description":"Pay rent","isDone":true},{"description":"Buy stamps","isDone":false}]"#;

    #[test]
    fn first_task_selected_on_start() {
        let tmp = TempDir::new().unwrap();
        let app = app_with(&tmp, THREE);
        assert_eq!(app.cursor_row(), Some(0));
    }

    #[test]
    fn selection_follows_task_through_filter() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, THREE);
        app.move_selection(2);
        let stamps = app.selected().unwrap();
        assert_eq!(app.cursor_row(), Some(2));

        app.filter = Some("buy".into());
        app.normalize_selection();
        assert_eq!(app.selected(), Some(stamps));
        assert_eq!(app.cursor_row(), Some(1));
    }

    #[test]
    fn filtered_out_selection_falls_back_to_first_visible() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, THREE);
        app.move_selection(1); // Pay rent
        app.filter = Some("buy".into());
        app.normalize_selection();
        assert_eq!(app.cursor_row(), Some(0));
        let milk = app.current_project().tasks[0].id();
        assert_eq!(app.selected(), Some(milk));
    }

    #[test]
    fn remove_selects_next_then_previous() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, THREE);
        app.move_selection(1);
        app.remove_selected().unwrap();
        assert_eq!(descriptions(&app), vec!["Buy milk", "Buy stamps"]);
        assert_eq!(app.cursor_row(), Some(1));

        app.remove_selected().unwrap();
        assert_eq!(descriptions(&app), vec!["Buy milk"]);
        assert_eq!(app.cursor_row(), Some(0));

        app.remove_selected().unwrap();
        assert!(descriptions(&app).is_empty());
        assert_eq!(app.selected(), None);
        assert_eq!(fs::read_to_string(tmp.path().join("tasks.json")).unwrap(), "[]");
    }

    #[test]
    fn edit_targets_task_by_id() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, THREE);
        app.move_selection(2);
        app.start_edit();
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.input, "Buy stamps");

        app.input = "Buy envelopes".into();
        app.submit_input().unwrap();
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(descriptions(&app), vec!["Buy milk", "Pay rent", "Buy envelopes"]);
        assert!(app.current_project().tasks[1].is_done);
    }

    #[test]
    fn blank_insert_is_discarded() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, "[]");
        app.start_insert();
        app.input = "   ".into();
        app.submit_input().unwrap();
        assert_eq!(app.mode, Mode::Navigate);
        assert!(descriptions(&app).is_empty());
        assert_eq!(fs::read_to_string(tmp.path().join("tasks.json")).unwrap(), "[]");
    }

    #[test]
    fn blank_edit_keeps_description() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, THREE);
        app.start_edit();
        app.input.clear();
        app.submit_input().unwrap();
        assert_eq!(descriptions(&app)[0], "Buy milk");
    }

    #[test]
    fn insert_adds_selects_and_saves() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, "[]");
        app.start_insert();
        app.input = "Buy milk".into();
        app.submit_input().unwrap();
        assert_eq!(app.mode, Mode::Insert);
        assert!(app.input.is_empty());
        assert_eq!(app.cursor_row(), Some(0));
        assert_eq!(
            fs::read_to_string(tmp.path().join("tasks.json")).unwrap(),
            r#"[{"description":"Buy milk","isDone":false}]"#
        );
    }

    #[test]
    fn on_exit_timing_writes_on_close() {
        let tmp = TempDir::new().unwrap();
        let config = TodoConfig {
            persistence: PersistenceConfig {
                save: SaveTiming::OnExit,
            },
            ..Default::default()
        };
        let session = Session::open(tmp.path(), &config).unwrap();
        let mut app = App::new(session, &config.ui);
        app.start_insert();
        app.input = "Later".into();
        app.submit_input().unwrap();
        assert!(!tmp.path().join("tasks.json").exists());

        app.session.close().unwrap();
        assert!(tmp.path().join("tasks.json").exists());
    }

    #[test]
    fn switch_project_wraps() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("todo.toml"),
            "[[projects]]\nname = \"Home\"\nfile = \"home.json\"\n\n[[projects]]\nname = \"Work\"\nfile = \"work.json\"\n",
        )
        .unwrap();
        let session = Session::open_dir(tmp.path()).unwrap();
        let mut app = App::new(session, &UiConfig::default());
        app.switch_project(1);
        assert_eq!(app.current_project().name(), "Work");
        app.switch_project(1);
        assert_eq!(app.current_project().name(), "Home");
        app.switch_project(-1);
        assert_eq!(app.current_project().name(), "Work");
    }
}
