use chrono::Local;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, Mode, normalize_range};

const HELP_LINES: [&str; 18] = [
    "NemoS Help",
    "",
    "Arrow keys / PageUp / PageDown   Move the cursor",
    "Enter                            Split the line",
    "Backspace / Delete               Delete the character before the cursor",
    "Tab                              Insert spaces",
    "Ctrl+S                           Save",
    "Ctrl+R                           Rename the file",
    "Ctrl+O                           Open another file",
    "Ctrl+C                           Copy mode (select, then Ctrl+C again)",
    "Ctrl+V                           Paste",
    "Ctrl+Z / Ctrl+Y                  Undo / Redo",
    "Ctrl+F / Ctrl+K                  Find / Replace",
    "Ctrl+D / Ctrl+T                  Show the date / Live clock",
    "Ctrl+P                           Print",
    "Ctrl+H / F1                      This help",
    "Ctrl+X                           Exit (Esc or Ctrl+X cancels prompts)",
    "Press any key to return.",
];

pub fn ui(f: &mut Frame<'_>, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());
    let text_area = rows[0];
    let status_area = rows[1];

    if app.mode == Mode::Help {
        render_help(f, app, text_area);
    } else {
        render_text(f, app, text_area);
    }
    render_status(f, app, status_area);

    let overlay = match &app.mode {
        Mode::Clock => Some(format!("The time is: {}", Local::now().format("%H:%M:%S"))),
        mode => mode.overlay_text(),
    };
    let overlay_area = Rect {
        y: text_area.bottom().saturating_sub(1),
        height: text_area.height.min(1),
        ..text_area
    };
    if let Some(text) = overlay {
        f.render_widget(Clear, overlay_area);
        f.render_widget(
            Paragraph::new(text).style(Style::default().fg(app.theme.text_fg)),
            overlay_area,
        );
    }

    match &app.mode {
        Mode::Prompt(prompt) => {
            let typed = display_width(prompt.label()) + display_width(&prompt.input);
            let x = overlay_area.x + typed.min(u16::MAX as usize) as u16;
            if x < overlay_area.right() {
                f.set_cursor_position(Position::new(x, overlay_area.y));
            }
        }
        Mode::Editing | Mode::Select { .. } => {
            let line = app.buffer.line(app.cursor_row);
            let x = text_area.x + width_between(line, app.viewport.col_offset, app.cursor_col) as u16;
            let y = text_area.y + app.cursor_row.saturating_sub(app.viewport.row_offset) as u16;
            if x < text_area.right() && y < text_area.bottom() {
                f.set_cursor_position(Position::new(x, y));
            }
        }
        _ => {}
    }
}

fn render_text(f: &mut Frame<'_>, app: &App, area: Rect) {
    let cols = area.width as usize;
    let text_style = Style::default().fg(app.theme.text_fg);
    let selected_style = Style::default()
        .fg(app.theme.selection_fg)
        .bg(app.theme.selection_bg);
    let indicator_style = Style::default().fg(app.theme.indicator_fg);
    let selection = match app.mode {
        Mode::Select { anchor } => Some(normalize_range(anchor, (app.cursor_row, app.cursor_col))),
        _ => None,
    };

    let mut lines: Vec<Line<'static>> = Vec::with_capacity(area.height as usize);
    let last_row = app
        .buffer
        .line_count()
        .min(app.viewport.row_offset + area.height as usize);
    for row in app.viewport.row_offset..last_row {
        let line = app.buffer.line(row);
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut used = 0usize;
        let mut shown = 0usize;
        let mut visible_text = String::new();
        for (col, ch) in line.chars().enumerate().skip(app.viewport.col_offset) {
            let w = ch.width().unwrap_or(0);
            if used + w > cols {
                break;
            }
            used += w;
            shown += 1;
            // A kept '\r' from CRLF files takes no cell.
            if ch.is_control() {
                continue;
            }
            visible_text.push(ch);
            let in_selection = selection
                .map(|(start, end)| start <= (row, col) && (row, col) < end)
                .unwrap_or(false);
            let style = if in_selection { selected_style } else { text_style };
            spans.push(Span::styled(ch.to_string(), style));
        }

        let line_len = line.chars().count();
        let shows_left = row == app.cursor_row
            && app.viewport.col_offset > 0
            && !visible_text.trim().is_empty();
        if shows_left && !spans.is_empty() {
            spans[0] = Span::styled("<", indicator_style);
        }
        if line_len > app.viewport.col_offset + shown && cols > 0 {
            if used >= cols {
                spans.pop();
            } else {
                spans.push(Span::raw(" ".repeat(cols - used - 1)));
            }
            spans.push(Span::styled(">", indicator_style));
        }
        lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn render_help(f: &mut Frame<'_>, app: &App, area: Rect) {
    let style = Style::default().fg(app.theme.help_fg);
    let lines: Vec<Line<'static>> = HELP_LINES
        .iter()
        .map(|l| Line::from(Span::styled(*l, style)))
        .collect();
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines), area);
}

fn render_status(f: &mut Frame<'_>, app: &App, area: Rect) {
    let modified = if app.dirty { " [Modified]" } else { "" };
    let status = format!(
        "NemoS | File: {}{} | File Size: {} | Word Count: {} | Line: {} | Column: {} | Ctrl+H: Help | Ctrl+X: Exit",
        app.file_path.display(),
        modified,
        app.file_size_label(),
        app.word_count(),
        app.cursor_row + 1,
        app.cursor_col + 1,
    );
    let paragraph = Paragraph::new(status).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(paragraph, area);
}

fn display_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Screen width of the characters in `[from, to)` of `line`.
fn width_between(line: &str, from: usize, to: usize) -> usize {
    line.chars()
        .skip(from)
        .take(to.saturating_sub(from))
        .map(|c| c.width().unwrap_or(0))
        .sum()
}
