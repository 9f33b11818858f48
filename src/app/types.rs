use std::path::PathBuf;

use super::buffer::LineBuffer;
use super::clipboard::Clipboard;
use super::history::History;
use super::motion::Viewport;
use super::print::PrintSpooler;
use super::storage::Storage;
use super::theme::Theme;

pub const DEFAULT_FILE_NAME: &str = "untitled.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Editing,
    Prompt(Prompt),
    ConfirmExit,
    /// Waiting for Y/N on whether to save before switching to the given file.
    ConfirmSaveOnOpen(PathBuf),
    /// Copy mode; the cursor is the active end of the selection.
    Select { anchor: (usize, usize) },
    Clock,
    Help,
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub(crate) kind: PromptKind,
    pub(crate) input: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Rename,
    Find,
    ReplaceFind,
    ReplaceWith(String),
    Open,
}

impl Prompt {
    pub(crate) fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self.kind {
            PromptKind::Rename => "Enter new filename: ",
            PromptKind::Find | PromptKind::ReplaceFind => "Enter text to find: ",
            PromptKind::ReplaceWith(_) => "Enter text to replace: ",
            PromptKind::Open => "Enter filename to open: ",
        }
    }
}

impl Mode {
    /// One-line text drawn over the bottom row of the text area, if any.
    pub fn overlay_text(&self) -> Option<String> {
        match self {
            Mode::Editing | Mode::Help | Mode::Clock => None,
            Mode::Prompt(prompt) => Some(format!("{}{}", prompt.label(), prompt.input)),
            Mode::ConfirmExit => {
                Some("Warning: Are you sure you want to leave without saving? (Y/N)".to_string())
            }
            Mode::ConfirmSaveOnOpen(_) => {
                Some("Do you want to save the current file first? (Y/N): ".to_string())
            }
            Mode::Select { .. } => Some(
                "Copy Mode: Use arrow keys to select, Ctrl+C to copy, Ctrl+X to cancel!"
                    .to_string(),
            ),
            Mode::Message(msg) => Some(msg.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// External collaborators the controller talks to.
pub struct Services {
    pub storage: Box<dyn Storage>,
    pub clipboard: Box<dyn Clipboard>,
    pub spooler: Box<dyn PrintSpooler>,
}

pub struct App {
    pub(crate) buffer: LineBuffer,
    pub(crate) cursor_row: usize,
    pub(crate) cursor_col: usize,
    pub(crate) viewport: Viewport,
    pub(crate) history: History,
    pub(crate) mode: Mode,
    pub(crate) file_path: PathBuf,
    pub(crate) dirty: bool,
    pub(crate) redraw_requested: bool,
    pub(crate) tab_width: usize,
    pub(crate) theme: Theme,
    pub(crate) storage: Box<dyn Storage>,
    pub(crate) clipboard: Box<dyn Clipboard>,
    pub(crate) spooler: Box<dyn PrintSpooler>,
}

pub(crate) fn char_to_byte_idx(s: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or_else(|| s.len())
}

pub(crate) fn normalize_range(
    a: (usize, usize),
    b: (usize, usize),
) -> ((usize, usize), (usize, usize)) {
    if pos_le(a, b) {
        (a, b)
    } else {
        (b, a)
    }
}

fn pos_le(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.0 || (a.0 == b.0 && a.1 <= b.1)
}
