use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use super::types::{Direction, Mode, Prompt, PromptKind};
use super::App;

/// Applies one key event. Returns `true` once the user has confirmed exit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.kind == KeyEventKind::Release {
        return Ok(false);
    }
    let mode = std::mem::replace(&mut app.mode, Mode::Editing);
    match mode {
        Mode::Editing => return handle_editing(app, key),
        Mode::Prompt(prompt) => handle_prompt(app, prompt, key),
        Mode::ConfirmExit => {
            if is_yes(&key) {
                debug!(target: "editor", "exit_confirmed");
                return Ok(true);
            }
        }
        Mode::ConfirmSaveOnOpen(path) => handle_confirm_open(app, path, key),
        Mode::Select { anchor } => handle_select(app, anchor, key),
        // Any key leaves these.
        Mode::Clock | Mode::Help | Mode::Message(_) => {}
    }
    Ok(false)
}

fn is_ctrl(key: &KeyEvent, ch: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(ch)
}

fn is_cancel(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc || is_ctrl(key, 'x')
}

fn is_yes(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'))
}

fn is_no(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('n') | KeyCode::Char('N'))
}

fn plain_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(ch)
        }
        _ => None,
    }
}

fn arrow(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::PageUp => Some(Direction::Up),
        KeyCode::Down | KeyCode::PageDown => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

fn handle_editing(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char(ch) = key.code {
            return handle_control(app, ch.to_ascii_lowercase());
        }
    }
    if let Some(dir) = arrow(key.code) {
        app.move_cursor(dir);
        return Ok(false);
    }
    match key.code {
        KeyCode::Enter => app.insert_newline(),
        KeyCode::Backspace | KeyCode::Delete => app.backspace(),
        KeyCode::Tab => app.insert_tab(),
        KeyCode::F(1) => app.mode = Mode::Help,
        _ => {
            if let Some(ch) = plain_char(&key) {
                app.insert_char(ch);
            }
        }
    }
    Ok(false)
}

fn handle_control(app: &mut App, ch: char) -> Result<bool> {
    match ch {
        'x' => {
            if !app.dirty {
                return Ok(true);
            }
            app.mode = Mode::ConfirmExit;
        }
        's' => match app.save() {
            Ok(()) => app.show_message("File has been saved! :)"),
            Err(err) => app.report(err),
        },
        'r' => app.mode = Mode::Prompt(Prompt::new(PromptKind::Rename)),
        'o' => app.mode = Mode::Prompt(Prompt::new(PromptKind::Open)),
        'f' => app.mode = Mode::Prompt(Prompt::new(PromptKind::Find)),
        'k' => app.mode = Mode::Prompt(Prompt::new(PromptKind::ReplaceFind)),
        'c' => {
            app.mode = Mode::Select {
                anchor: (app.cursor_row, app.cursor_col),
            }
        }
        'v' => {
            if let Err(err) = app.paste() {
                app.report(err);
            }
        }
        'z' => {
            if let Err(err) = app.undo() {
                app.report(err);
            }
        }
        'y' => {
            if let Err(err) = app.redo() {
                app.report(err);
            }
        }
        'd' => {
            let today = Local::now().format("%d-%m-%Y");
            app.show_message(format!("The date is: {}", today));
        }
        't' => app.mode = Mode::Clock,
        'p' => match app.print() {
            Ok(()) => app.show_message("Document sent to the printer! :)"),
            Err(err) => app.report(err),
        },
        'h' => app.mode = Mode::Help,
        _ => {}
    }
    Ok(false)
}

fn handle_prompt(app: &mut App, mut prompt: Prompt, key: KeyEvent) {
    if is_cancel(&key) {
        return;
    }
    match key.code {
        KeyCode::Enter => submit_prompt(app, prompt),
        KeyCode::Backspace => {
            prompt.input.pop();
            app.mode = Mode::Prompt(prompt);
        }
        _ => {
            if let Some(ch) = plain_char(&key) {
                prompt.input.push(ch);
            }
            app.mode = Mode::Prompt(prompt);
        }
    }
}

fn submit_prompt(app: &mut App, prompt: Prompt) {
    let input = prompt.input;
    // An empty answer is treated like cancelling, except as a replacement text.
    if input.is_empty() && !matches!(prompt.kind, PromptKind::ReplaceWith(_)) {
        return;
    }
    match prompt.kind {
        PromptKind::Find => {
            if app.find(&input) {
                app.show_message("Text has been found! :)");
            } else {
                app.show_message("Error: Text has not been found! :(");
            }
        }
        PromptKind::ReplaceFind => {
            app.mode = Mode::Prompt(Prompt::new(PromptKind::ReplaceWith(input)));
        }
        PromptKind::ReplaceWith(needle) => {
            if app.replace(&needle, &input) > 0 {
                app.show_message("Text has been replaced. :)");
            } else {
                app.show_message("Error: Text has not been found. :(");
            }
        }
        PromptKind::Rename => match app.rename_file(PathBuf::from(input)) {
            Ok(()) => app.show_message("File renamed successfully. :)"),
            Err(err) => app.report(err),
        },
        PromptKind::Open => {
            if let Err(err) = app.request_open(PathBuf::from(input)) {
                app.report(err);
            }
        }
    }
}

fn handle_confirm_open(app: &mut App, path: PathBuf, key: KeyEvent) {
    if is_cancel(&key) {
        return;
    }
    if is_yes(&key) {
        if let Err(err) = app.save() {
            app.report(err);
            return;
        }
    } else if !is_no(&key) {
        app.mode = Mode::ConfirmSaveOnOpen(path);
        return;
    }
    if let Err(err) = app.open_file(path) {
        app.report(err);
    }
}

fn handle_select(app: &mut App, anchor: (usize, usize), key: KeyEvent) {
    if is_cancel(&key) {
        return;
    }
    if is_ctrl(&key, 'c') {
        match app.copy_selection(anchor) {
            Ok(()) => app.show_message("Selected text copied to clipboard! :)"),
            Err(err) => app.report(err),
        }
        return;
    }
    if let Some(dir) = arrow(key.code) {
        app.move_selection_end(dir);
    }
    app.mode = Mode::Select { anchor };
}
