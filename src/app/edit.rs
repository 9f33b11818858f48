use std::path::PathBuf;

use tracing::{debug, warn};

use super::buffer::LineBuffer;
use super::config::Config;
use super::error::EditorError;
use super::history::History;
use super::motion::Viewport;
use super::types::{DEFAULT_FILE_NAME, Mode, Services, normalize_range};
use super::App;

impl App {
    pub fn new(config: &Config, services: Services) -> Self {
        Self {
            buffer: LineBuffer::new(),
            cursor_row: 0,
            cursor_col: 0,
            viewport: Viewport::default(),
            history: History::new(config.undo_limit),
            mode: Mode::Editing,
            file_path: PathBuf::from(DEFAULT_FILE_NAME),
            dirty: false,
            redraw_requested: false,
            tab_width: config.tab_width,
            theme: config.resolve_theme(),
            storage: services.storage,
            clipboard: services.clipboard,
            spooler: services.spooler,
        }
    }

    pub(super) fn show_message(&mut self, msg: impl Into<String>) {
        self.mode = Mode::Message(msg.into());
    }

    /// Every recoverable failure ends up here: logged, then shown until a key is pressed.
    pub(super) fn report(&mut self, err: EditorError) {
        warn!(target: "editor", error = %err, "operation_failed");
        self.show_message(err.to_string());
    }

    pub(super) fn record_undo(&mut self) {
        self.history.record(self.buffer.lines());
    }

    fn restore(&mut self, lines: Vec<String>) {
        self.buffer.restore(lines);
        self.ensure_cursor_visible();
        self.dirty = true;
    }

    pub(super) fn undo(&mut self) -> Result<(), EditorError> {
        let previous = self.history.undo(self.buffer.snapshot())?;
        self.restore(previous);
        debug!(target: "history", undo = self.history.undo_len(), redo = self.history.redo_len(), "undo");
        Ok(())
    }

    pub(super) fn redo(&mut self) -> Result<(), EditorError> {
        let next = self.history.redo(self.buffer.snapshot())?;
        self.restore(next);
        debug!(target: "history", undo = self.history.undo_len(), redo = self.history.redo_len(), "redo");
        Ok(())
    }

    pub(super) fn insert_char(&mut self, ch: char) {
        self.record_undo();
        self.buffer.insert_char(self.cursor_row, self.cursor_col, ch);
        self.dirty = true;
        self.set_cursor(self.cursor_row, self.cursor_col + 1);
    }

    pub(super) fn insert_tab(&mut self) {
        self.record_undo();
        let spaces = " ".repeat(self.tab_width);
        self.buffer.insert_str(self.cursor_row, self.cursor_col, &spaces);
        self.dirty = true;
        self.set_cursor(self.cursor_row, self.cursor_col + self.tab_width);
    }

    pub(super) fn insert_newline(&mut self) {
        self.record_undo();
        self.buffer.split_line(self.cursor_row, self.cursor_col);
        self.dirty = true;
        self.viewport.col_offset = 0;
        self.set_cursor(self.cursor_row + 1, 0);
    }

    pub(super) fn backspace(&mut self) {
        if self.cursor_row == 0 && self.cursor_col == 0 {
            return;
        }
        self.record_undo();
        if let Some((row, col)) = self.buffer.delete_char(self.cursor_row, self.cursor_col) {
            self.dirty = true;
            self.set_cursor(row, col);
        }
    }

    pub(super) fn paste(&mut self) -> Result<(), EditorError> {
        let text = self.clipboard.get_text()?;
        let pasted: Vec<String> = text.lines().map(str::to_string).collect();
        if pasted.is_empty() {
            return Ok(());
        }
        self.record_undo();
        let (row, col) = self
            .buffer
            .insert_lines(self.cursor_row, self.cursor_col, &pasted);
        self.dirty = true;
        debug!(target: "edit", lines = pasted.len(), bytes = text.len(), "paste");
        self.set_cursor(row, col);
        Ok(())
    }

    /// Moves to the first match from the top. Returns whether one was found.
    pub(super) fn find(&mut self, needle: &str) -> bool {
        match self.buffer.find(needle) {
            Some((row, col)) => {
                self.set_cursor(row, col);
                true
            }
            None => false,
        }
    }

    /// Replaces the first match on each line. Returns how many lines changed.
    pub(super) fn replace(&mut self, needle: &str, replacement: &str) -> usize {
        if self.buffer.find(needle).is_none() {
            return 0;
        }
        self.record_undo();
        let changed = self.buffer.replace_first_per_line(needle, replacement);
        self.dirty = true;
        self.ensure_cursor_visible();
        debug!(target: "edit", changed, "replace");
        changed
    }

    pub(super) fn copy_selection(&mut self, anchor: (usize, usize)) -> Result<(), EditorError> {
        let (start, end) = normalize_range(anchor, (self.cursor_row, self.cursor_col));
        let text = self.buffer.text_in_range(start, end);
        self.clipboard.set_text(&text)
    }

    pub fn word_count(&self) -> usize {
        self.buffer.word_count()
    }
}
