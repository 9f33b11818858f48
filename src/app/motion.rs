use tracing::debug;
use unicode_width::UnicodeWidthChar;

use super::App;
use super::types::Direction;

/// Top-left visible cell plus the size of the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub(crate) row_offset: usize,
    pub(crate) col_offset: usize,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_terminal(80, 24)
    }
}

impl Viewport {
    /// Text area for a terminal of the given size; the last row is the status bar.
    pub fn from_terminal(term_cols: u16, term_rows: u16) -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
            rows: (term_rows as usize).saturating_sub(1).max(1),
            cols: (term_cols as usize).max(1),
        }
    }

    pub fn resize(&mut self, term_cols: u16, term_rows: u16) {
        let sized = Self::from_terminal(term_cols, term_rows);
        self.rows = sized.rows;
        self.cols = sized.cols;
    }

    pub fn reset(&mut self) {
        self.row_offset = 0;
        self.col_offset = 0;
    }

    /// Scrolls so the cell at `(row, col)` of `line` is visible. `col_offset`
    /// stays a char index, but the visible width is measured in display cells.
    pub fn scroll_to(&mut self, row: usize, col: usize, line: &str) {
        if row < self.row_offset {
            self.row_offset = row;
        } else if row >= self.row_offset + self.rows {
            self.row_offset = row + 1 - self.rows;
        }

        if col < self.col_offset {
            self.col_offset = col;
            return;
        }
        let widths: Vec<usize> = line.chars().map(|c| c.width().unwrap_or(0)).collect();
        let cursor_width = widths.get(col).copied().unwrap_or(1).max(1);
        let end = col.min(widths.len());
        let mut span: usize = widths[self.col_offset.min(end)..end].iter().sum();
        while self.col_offset < col && span + cursor_width > self.cols {
            span -= widths.get(self.col_offset).copied().unwrap_or(0);
            self.col_offset += 1;
        }
    }
}

impl App {
    pub(crate) fn line_len(&self, row: usize) -> usize {
        self.buffer.line_len(row)
    }

    pub(crate) fn clamp_cursor(&mut self) {
        let last_row = self.buffer.line_count().saturating_sub(1);
        self.cursor_row = self.cursor_row.min(last_row);
        self.cursor_col = self.cursor_col.min(self.line_len(self.cursor_row));
    }

    /// Clamp the cursor into the document and scroll it into view.
    pub(crate) fn ensure_cursor_visible(&mut self) {
        self.clamp_cursor();
        let line = self.buffer.line(self.cursor_row);
        self.viewport.scroll_to(self.cursor_row, self.cursor_col, line);
    }

    pub(crate) fn set_cursor(&mut self, row: usize, col: usize) {
        self.cursor_row = row;
        self.cursor_col = col;
        self.ensure_cursor_visible();
    }

    pub fn resize(&mut self, term_cols: u16, term_rows: u16) {
        self.viewport.resize(term_cols, term_rows);
        debug!(
            target: "viewport",
            rows = self.viewport.rows,
            cols = self.viewport.cols,
            "resize"
        );
        self.ensure_cursor_visible();
        self.redraw_requested = true;
    }

    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Editing-mode navigation. Vertical moves go to column 0 of the new line.
    pub(crate) fn move_cursor(&mut self, dir: Direction) {
        match dir {
            Direction::Up => {
                if self.cursor_row > 0 {
                    self.cursor_row -= 1;
                    self.cursor_col = 0;
                    self.viewport.col_offset = 0;
                }
            }
            Direction::Down => {
                if self.cursor_row + 1 < self.buffer.line_count() {
                    self.cursor_row += 1;
                    self.cursor_col = 0;
                    self.viewport.col_offset = 0;
                }
            }
            Direction::Left => {
                if self.cursor_col > 0 {
                    self.cursor_col -= 1;
                } else if self.cursor_row > 0 {
                    self.cursor_row -= 1;
                    self.cursor_col = self.line_len(self.cursor_row);
                    // Scrolling from the left edge right-aligns a long line.
                    self.viewport.col_offset = 0;
                }
            }
            Direction::Right => {
                if self.cursor_col < self.line_len(self.cursor_row) {
                    self.cursor_col += 1;
                } else if self.cursor_row + 1 < self.buffer.line_count() {
                    self.cursor_row += 1;
                    self.cursor_col = 0;
                    self.viewport.col_offset = 0;
                }
            }
        }
        self.ensure_cursor_visible();
    }

    /// Copy-mode navigation: stays on the line horizontally and keeps the
    /// column (clamped) when changing lines.
    pub(crate) fn move_selection_end(&mut self, dir: Direction) {
        match dir {
            Direction::Up => {
                self.cursor_row = self.cursor_row.saturating_sub(1);
            }
            Direction::Down => {
                if self.cursor_row + 1 < self.buffer.line_count() {
                    self.cursor_row += 1;
                }
            }
            Direction::Left => {
                self.cursor_col = self.cursor_col.saturating_sub(1);
            }
            Direction::Right => {
                if self.cursor_col < self.line_len(self.cursor_row) {
                    self.cursor_col += 1;
                }
            }
        }
        self.ensure_cursor_visible();
    }
}
