use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ops::task_ops;

use super::app::{App, Mode};

/// Main render function: tab bar | task list | input row | key hints
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let hint_rows = if app.show_key_hints { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),         // tabs + separator
            Constraint::Min(1),            // task list
            Constraint::Length(1),         // input / status row
            Constraint::Length(hint_rows), // key hints
        ])
        .split(area);

    render_tab_bar(frame, app, chunks[0]);
    render_task_list(frame, app, chunks[1]);
    render_input_row(frame, app, chunks[2]);
    if app.show_key_hints {
        render_key_hints(frame, app, chunks[3]);
    }
}

fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default().bg(bg))];
    for (i, project) in app.session.projects().iter().enumerate() {
        let is_current = i == app.active_project;
        let style = if is_current {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        // `*` marks changes held back until exit
        let unsaved = if app.session.is_dirty(i) { "*" } else { "" };
        spans.push(Span::styled(
            format!(
                " {}{} {}/{} ",
                project.name(),
                unsaved,
                task_ops::done_count(&project.tasks),
                project.tasks.len()
            ),
            style,
        ));
        spans.push(Span::styled(
            "\u{2502}",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(
            "\u{2500}".repeat(area.width as usize),
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let ids = app.visible_ids();

    if ids.is_empty() {
        let message = match &app.filter {
            Some(pattern) if !app.current_project().tasks.is_empty() => {
                format!(" No tasks match /{}", pattern)
            }
            _ => " No tasks. Press a to add one.".to_string(),
        };
        let empty = Paragraph::new(message).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    // Keep the cursor row on screen
    let height = area.height as usize;
    if let Some(row) = app.cursor_row() {
        if row < app.scroll_offset {
            app.scroll_offset = row;
        } else if row >= app.scroll_offset + height {
            app.scroll_offset = row + 1 - height;
        }
    }
    app.scroll_offset = app.scroll_offset.min(ids.len().saturating_sub(1));

    let selected = app.selected();
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    for id in ids.iter().skip(app.scroll_offset).take(height) {
        let Some(task) = app.session.workspace().task(*id) else {
            continue;
        };
        let is_cursor = selected == Some(*id);
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };

        let marker = if is_cursor { "\u{25B8} " } else { "  " };
        let check = if task.is_done { "[x] " } else { "[ ] " };
        let prefix_width = marker.width() + check.width();
        let description = truncate_to_width(
            &task.description,
            width.saturating_sub(prefix_width),
        );

        let mut text_style = Style::default().fg(app.theme.text_bright).bg(row_bg);
        if task.is_done {
            text_style = Style::default()
                .fg(app.theme.dim)
                .bg(row_bg)
                .add_modifier(Modifier::CROSSED_OUT);
        }
        if is_cursor {
            text_style = text_style.add_modifier(Modifier::BOLD);
        }

        let mut spans = vec![
            Span::styled(marker, Style::default().fg(app.theme.highlight).bg(row_bg)),
            Span::styled(
                check,
                Style::default()
                    .fg(app.theme.check_color(task.is_done))
                    .bg(row_bg),
            ),
            Span::styled(description, text_style),
        ];

        // Pad cursor line so the highlight spans the full width
        if is_cursor {
            let used: usize = spans.iter().map(|s| s.content.width()).sum();
            if used < width {
                spans.push(Span::styled(
                    " ".repeat(width - used),
                    Style::default().bg(row_bg),
                ));
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn render_input_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let prompt = match app.mode {
        Mode::Navigate => {
            let line = match &app.filter {
                Some(pattern) => Line::from(Span::styled(
                    format!(" /{}", pattern),
                    Style::default().fg(app.theme.dim).bg(bg),
                )),
                None => Line::from(""),
            };
            frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
            return;
        }
        Mode::Insert => " new: ",
        Mode::Edit => " edit: ",
        Mode::Filter => " /",
    };

    let (before, after) = app.input.split_at(app.input_cursor);
    let line = Line::from(vec![
        Span::styled(prompt, Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(
            before.to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
        Span::styled(
            after.to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

fn render_key_hints(frame: &mut Frame, app: &App, area: Rect) {
    let hint = match app.mode {
        Mode::Navigate => " a add  e edit  space toggle  d remove  / filter  tab project  q quit",
        Mode::Insert | Mode::Edit => " Enter save  Esc cancel",
        Mode::Filter => " Enter keep filter  Esc clear",
    };
    let line = Line::from(Span::styled(
        hint,
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    ));
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(app.theme.background)),
        area,
    );
}

/// Cut `text` to at most `max` display columns, ending in `…` when cut
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}
