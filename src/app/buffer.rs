use super::types::char_to_byte_idx;

/// Ordered, never-empty sequence of text lines. Columns are char indices.
///
/// The buffer knows nothing about undo; callers snapshot it before mutating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    /// Splits on `'\n'` only, so a `'\r'` before it stays part of the line
    /// and is written back unchanged.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::new();
        }
        let body = text.strip_suffix('\n').unwrap_or(text);
        Self::from_lines(body.split('\n').map(str::to_string).collect())
    }

    pub fn from_lines(mut lines: Vec<String>) -> Self {
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map(|s| s.as_str()).unwrap_or("")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_len(&self, row: usize) -> usize {
        self.line(row).chars().count()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lines.clone()
    }

    pub fn restore(&mut self, lines: Vec<String>) {
        *self = Self::from_lines(lines);
    }

    /// Persisted form: every line, including the last, is newline-terminated.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn insert_char(&mut self, row: usize, col: usize, ch: char) {
        let line = &mut self.lines[row];
        let byte_idx = char_to_byte_idx(line, col);
        line.insert(byte_idx, ch);
    }

    pub fn insert_str(&mut self, row: usize, col: usize, text: &str) {
        let line = &mut self.lines[row];
        let byte_idx = char_to_byte_idx(line, col);
        line.insert_str(byte_idx, text);
    }

    /// Backspace at `(row, col)`. Returns the resulting cursor, or `None` at the
    /// very start of the document where nothing changes.
    pub fn delete_char(&mut self, row: usize, col: usize) -> Option<(usize, usize)> {
        if col > 0 {
            let line = &mut self.lines[row];
            let start = char_to_byte_idx(line, col - 1);
            let end = char_to_byte_idx(line, col);
            line.replace_range(start..end, "");
            Some((row, col - 1))
        } else if row > 0 {
            let current = self.lines.remove(row);
            let prev = &mut self.lines[row - 1];
            let prev_len = prev.chars().count();
            prev.push_str(&current);
            Some((row - 1, prev_len))
        } else {
            None
        }
    }

    pub fn split_line(&mut self, row: usize, col: usize) {
        let line = &mut self.lines[row];
        let byte_idx = char_to_byte_idx(line, col);
        let right = line.split_off(byte_idx);
        self.lines.insert(row + 1, right);
    }

    /// Pastes `pasted` at `(row, col)` and returns the cursor just past the
    /// pasted text, i.e. before the remainder of the original line.
    pub fn insert_lines(&mut self, row: usize, col: usize, pasted: &[String]) -> (usize, usize) {
        let Some((last, rest)) = pasted.split_last() else {
            return (row, col);
        };
        let line = &mut self.lines[row];
        let byte_idx = char_to_byte_idx(line, col);
        let after = line.split_off(byte_idx);

        if rest.is_empty() {
            line.push_str(last);
            let cursor_col = col + last.chars().count();
            line.push_str(&after);
            return (row, cursor_col);
        }

        line.push_str(&rest[0]);
        let middle = rest[1..].iter().cloned();
        let mut tail = last.clone();
        let cursor_col = tail.chars().count();
        tail.push_str(&after);
        let new_lines: Vec<String> = middle.chain(std::iter::once(tail)).collect();
        let added = new_lines.len();
        self.lines.splice(row + 1..row + 1, new_lines);
        (row + added, cursor_col)
    }

    /// First literal, case-sensitive match scanning from the top.
    pub fn find(&self, needle: &str) -> Option<(usize, usize)> {
        if needle.is_empty() {
            return None;
        }
        self.lines.iter().enumerate().find_map(|(row, line)| {
            line.find(needle)
                .map(|byte_idx| (row, line[..byte_idx].chars().count()))
        })
    }

    /// Replaces the first match on every line. Returns how many lines changed.
    pub fn replace_first_per_line(&mut self, needle: &str, replacement: &str) -> usize {
        if needle.is_empty() {
            return 0;
        }
        let mut changed = 0;
        for line in &mut self.lines {
            if let Some(byte_idx) = line.find(needle) {
                line.replace_range(byte_idx..byte_idx + needle.len(), replacement);
                changed += 1;
            }
        }
        changed
    }

    /// Text between two positions, `start` inclusive and `end` exclusive.
    pub fn text_in_range(&self, start: (usize, usize), end: (usize, usize)) -> String {
        let mut out = String::new();
        for row in start.0..=end.0.min(self.lines.len().saturating_sub(1)) {
            let line = &self.lines[row];
            let from = if row == start.0 { start.1 } else { 0 };
            let to = if row == end.0 {
                end.1
            } else {
                line.chars().count()
            };
            if from < to {
                let a = char_to_byte_idx(line, from);
                let b = char_to_byte_idx(line, to);
                out.push_str(&line[a..b]);
            }
            if row < end.0 {
                out.push('\n');
            }
        }
        out
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|line| count_words(line)).sum()
    }
}

/// Whitespace-separated tokens that still contain something after ASCII
/// punctuation is stripped.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| token.chars().any(|ch| !ch.is_ascii_punctuation()))
        .count()
}
