use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;

use crate::ops::session::SessionError;

use super::app::{App, Mode};

/// Handle a key event in the current mode.
///
/// Session errors (failed saves) are returned to the event loop, which
/// tears down the UI and reports them.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<(), SessionError> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Insert | Mode::Edit | Mode::Filter => handle_text_input(app, key),
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) -> Result<(), SessionError> {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => {
            if app.filter.is_some() {
                app.clear_filter();
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => app.switch_project(1),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => app.switch_project(-1),
        KeyCode::Char('a') | KeyCode::Char('o') => app.start_insert(),
        KeyCode::Char('e') | KeyCode::Enter => app.start_edit(),
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_selected()?,
        KeyCode::Char('d') | KeyCode::Delete => app.remove_selected()?,
        KeyCode::Char('/') => app.start_filter(),
        _ => {}
    }
    Ok(())
}

fn handle_text_input(app: &mut App, key: KeyEvent) -> Result<(), SessionError> {
    let mut changed = false;
    match key.code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Enter => app.submit_input()?,
        KeyCode::Backspace => {
            if let Some(start) = prev_boundary(app) {
                app.input.replace_range(start..app.input_cursor, "");
                app.input_cursor = start;
                changed = true;
            }
        }
        KeyCode::Delete => {
            if let Some(end) = next_boundary(app) {
                app.input.replace_range(app.input_cursor..end, "");
                changed = true;
            }
        }
        KeyCode::Left => {
            if let Some(start) = prev_boundary(app) {
                app.input_cursor = start;
            }
        }
        KeyCode::Right => {
            if let Some(end) = next_boundary(app) {
                app.input_cursor = end;
            }
        }
        KeyCode::Home => app.input_cursor = 0,
        KeyCode::End => app.input_cursor = app.input.len(),
        KeyCode::Char(_)
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
        KeyCode::Char(c) => {
            app.input.insert(app.input_cursor, c);
            app.input_cursor += c.len_utf8();
            changed = true;
        }
        _ => {}
    }
    if changed && app.mode == Mode::Filter {
        app.update_filter_from_input();
    }
    Ok(())
}

/// Byte offset of the grapheme boundary before the cursor
fn prev_boundary(app: &App) -> Option<usize> {
    app.input[..app.input_cursor]
        .grapheme_indices(true)
        .next_back()
        .map(|(i, _)| i)
}

/// Byte offset of the grapheme boundary after the cursor
fn next_boundary(app: &App) -> Option<usize> {
    app.input[app.input_cursor..]
        .graphemes(true)
        .next()
        .map(|g| app.input_cursor + g.len())
}
