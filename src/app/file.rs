use std::path::{Path, PathBuf};

use tracing::info;

use super::buffer::LineBuffer;
use super::error::EditorError;
use super::types::{DEFAULT_FILE_NAME, Mode};
use super::App;

impl App {
    /// Picks the startup file and loads it. Problems are shown as messages and
    /// the editor still starts; a file that fails to load is never adopted as
    /// the save target.
    pub fn startup(&mut self, path: Option<PathBuf>) {
        let mut path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));
        if !self.storage.is_safe(&path) {
            self.report(EditorError::UnsafePath(path));
            path = PathBuf::from(DEFAULT_FILE_NAME);
        }
        if let Err(err) = self.load(&path) {
            self.file_path = PathBuf::from(DEFAULT_FILE_NAME);
            self.report(err);
            return;
        }
        self.file_path = path.clone();
        if self.storage.exists(&path)
            && !self.storage.writable(&path)
            && self.mode == Mode::Editing
        {
            self.show_message("Error: No write permission - opening read-only! :(");
        }
    }

    /// Replaces the document with the file's contents; a missing file gives an
    /// empty document. On error the current document is left untouched.
    fn load(&mut self, path: &Path) -> Result<(), EditorError> {
        let buffer = if self.storage.exists(path) {
            if !self.storage.readable(path) {
                return Err(EditorError::AccessDenied(path.to_path_buf()));
            }
            let content = self.storage.read_to_string(path)?;
            LineBuffer::from_text(&content)
        } else {
            info!(target: "io", path = %path.display(), "new_file");
            LineBuffer::new()
        };
        self.buffer = buffer;
        self.dirty = false;
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.viewport.reset();
        self.history.clear();
        info!(
            target: "io",
            path = %path.display(),
            lines = self.buffer.line_count(),
            "loaded"
        );
        Ok(())
    }

    pub(super) fn save(&mut self) -> Result<(), EditorError> {
        let path = self.file_path.clone();
        if !self.storage.is_safe(&path) {
            return Err(EditorError::UnsafePath(path));
        }
        if self.storage.exists(&path) {
            if !self.storage.writable(&path) {
                return Err(EditorError::AccessDenied(path));
            }
        } else {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            if !self.storage.writable(&dir) {
                return Err(EditorError::AccessDenied(dir));
            }
        }
        self.storage.write(&path, &self.buffer.to_text())?;
        self.dirty = false;
        info!(target: "io", path = %path.display(), lines = self.buffer.line_count(), "saved");
        Ok(())
    }

    pub(super) fn rename_file(&mut self, new_path: PathBuf) -> Result<(), EditorError> {
        if !self.storage.is_safe(&new_path) {
            return Err(EditorError::UnsafePath(new_path));
        }
        if new_path == self.file_path || self.storage.exists(&new_path) {
            return Err(EditorError::RenameConflict(new_path));
        }
        if self.storage.exists(&self.file_path) {
            if !self.storage.writable(&self.file_path) {
                return Err(EditorError::AccessDenied(self.file_path.clone()));
            }
            self.storage.rename(&self.file_path, &new_path)?;
        }
        info!(
            target: "io",
            from = %self.file_path.display(),
            to = %new_path.display(),
            "renamed"
        );
        self.file_path = new_path;
        Ok(())
    }

    /// Validates `path` and either opens it or, with unsaved changes, asks first.
    pub(super) fn request_open(&mut self, path: PathBuf) -> Result<(), EditorError> {
        if !self.storage.is_safe(&path) {
            return Err(EditorError::UnsafePath(path));
        }
        if !self.storage.exists(&path) {
            return Err(EditorError::NotFound(path));
        }
        if !self.storage.readable(&path) {
            return Err(EditorError::AccessDenied(path));
        }
        if self.dirty {
            self.mode = Mode::ConfirmSaveOnOpen(path);
            return Ok(());
        }
        self.open_file(path)
    }

    pub(super) fn open_file(&mut self, path: PathBuf) -> Result<(), EditorError> {
        self.load(&path)?;
        self.file_path = path;
        Ok(())
    }

    pub(super) fn print(&mut self) -> Result<(), EditorError> {
        self.spooler.send(&self.buffer.to_text())
    }

    pub fn file_size_label(&self) -> String {
        match self.storage.size(&self.file_path) {
            Some(bytes) => format_size(bytes),
            None => "0 B".to_string(),
        }
    }
}

pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let size = bytes as f64;
    if size < KB {
        format!("{:.1} B", size)
    } else if size < KB * KB {
        format!("{:.1} KB", size / KB)
    } else if size < KB * KB * KB {
        format!("{:.1} MB", size / (KB * KB))
    } else {
        format!("{:.1} GB", size / (KB * KB * KB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{app_in, app_with_print_log};

    #[test]
    fn save_then_reload_round_trips_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        let mut app = app_in(dir.path(), &["a", "", "b"]);
        app.file_path = path.clone();
        app.dirty = true;
        app.save().unwrap();
        assert!(!app.dirty);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\n\nb\n");

        let mut other = app_in(dir.path(), &[""]);
        other.startup(Some(path));
        assert_eq!(other.buffer.lines(), &["a", "", "b"].map(String::from));
        assert_eq!(other.mode, Mode::Editing);
    }

    #[test]
    fn startup_with_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), &["stale"]);
        app.startup(Some(dir.path().join("new.txt")));
        assert_eq!(app.buffer.lines(), &[String::new()]);
        assert!(!app.dirty);
        assert_eq!(app.mode, Mode::Editing);
    }

    #[test]
    fn startup_with_unsafe_path_falls_back_to_untitled() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), &[""]);
        app.startup(Some(PathBuf::from("../escape.txt")));
        assert_eq!(app.file_path, PathBuf::from(DEFAULT_FILE_NAME));
        assert!(matches!(app.mode, Mode::Message(_)));
    }

    #[test]
    fn save_into_missing_directory_is_access_denied() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), &["x"]);
        app.file_path = dir.path().join("missing").join("doc.txt");
        assert!(matches!(app.save(), Err(EditorError::AccessDenied(_))));
    }

    #[test]
    fn save_outside_safe_dirs_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), &["x"]);
        app.file_path = PathBuf::from("/etc/nemo-test.txt");
        assert!(matches!(app.save(), Err(EditorError::UnsafePath(_))));
    }

    #[test]
    fn rename_moves_file_and_rejects_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old.txt");
        let taken = dir.path().join("taken.txt");
        std::fs::write(&old, "x\n").unwrap();
        std::fs::write(&taken, "y\n").unwrap();
        let mut app = app_in(dir.path(), &["x"]);
        app.file_path = old.clone();

        assert!(matches!(
            app.rename_file(taken.clone()),
            Err(EditorError::RenameConflict(_))
        ));
        assert!(matches!(
            app.rename_file(old.clone()),
            Err(EditorError::RenameConflict(_))
        ));

        let new = dir.path().join("new.txt");
        app.rename_file(new.clone()).unwrap();
        assert_eq!(app.file_path, new);
        assert!(new.exists());
        assert!(!old.exists());
    }

    #[test]
    fn rename_of_unsaved_document_adopts_new_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), &["x"]);
        app.file_path = dir.path().join("never-saved.txt");
        let new = dir.path().join("named.txt");
        app.rename_file(new.clone()).unwrap();
        assert_eq!(app.file_path, new);
        assert!(!new.exists());
    }

    #[test]
    fn open_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), &["x"]);
        assert!(matches!(
            app.request_open(dir.path().join("nope.txt")),
            Err(EditorError::NotFound(_))
        ));
    }

    #[test]
    fn open_with_unsaved_changes_asks_first() {
        let dir = tempfile::tempdir().unwrap();
        let other = dir.path().join("other.txt");
        std::fs::write(&other, "other\n").unwrap();
        let mut app = app_in(dir.path(), &["mine"]);
        app.dirty = true;
        app.request_open(other.clone()).unwrap();
        assert_eq!(app.mode, Mode::ConfirmSaveOnOpen(other));
        assert_eq!(app.buffer.line(0), "mine");
    }

    #[test]
    fn open_clean_document_switches_and_clears_history() {
        let dir = tempfile::tempdir().unwrap();
        let other = dir.path().join("other.txt");
        std::fs::write(&other, "one\ntwo\n").unwrap();
        let mut app = app_in(dir.path(), &["mine"]);
        app.record_undo();
        app.set_cursor(0, 3);
        app.request_open(other.clone()).unwrap();
        assert_eq!(app.file_path, other);
        assert_eq!(app.buffer.lines(), &["one", "two"].map(String::from));
        assert_eq!((app.cursor_row, app.cursor_col), (0, 0));
        assert_eq!(app.history.undo_len(), 0);
    }

    #[test]
    fn non_utf8_file_loads_lossily_and_saves_its_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, b"caf\xe9 au lait\nsecond line\n").unwrap();
        let mut app = app_in(dir.path(), &[""]);
        app.startup(Some(path.clone()));
        assert_eq!(app.mode, Mode::Editing);
        assert_eq!(app.file_path, path);
        assert_eq!(app.buffer.lines(), &["caf\u{fffd} au lait", "second line"].map(String::from));
        app.save().unwrap();
        let saved = std::fs::read_to_string(&path).unwrap();
        assert_eq!(saved.lines().count(), 2);
        assert!(saved.ends_with("second line\n"));
    }

    #[test]
    fn failed_startup_load_never_targets_that_path() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_file = dir.path().join("folder");
        std::fs::create_dir(&not_a_file).unwrap();
        let mut app = app_in(dir.path(), &[""]);
        app.startup(Some(not_a_file.clone()));
        assert!(matches!(app.mode, Mode::Message(_)));
        assert_eq!(app.file_path, PathBuf::from(DEFAULT_FILE_NAME));
        assert!(not_a_file.is_dir());
    }

    #[test]
    fn failed_open_keeps_current_document_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let mine = dir.path().join("mine.txt");
        let not_a_file = dir.path().join("folder");
        std::fs::create_dir(&not_a_file).unwrap();
        let mut app = app_in(dir.path(), &["keep me"]);
        app.file_path = mine.clone();
        assert!(matches!(app.request_open(not_a_file), Err(EditorError::Io(_))));
        assert_eq!(app.file_path, mine);
        assert_eq!(app.buffer.line(0), "keep me");
    }

    #[test]
    fn crlf_line_endings_survive_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dos.txt");
        std::fs::write(&path, "one\r\ntwo\r\n").unwrap();
        let mut app = app_in(dir.path(), &[""]);
        app.startup(Some(path.clone()));
        assert_eq!(app.buffer.line_count(), 2);
        app.save().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"one\r\ntwo\r\n");
    }

    #[test]
    fn print_sends_persisted_text() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, log) = app_with_print_log(dir.path(), &["a", "b"]);
        app.print().unwrap();
        assert_eq!(*log.borrow(), vec!["a\nb\n".to_string()]);
    }

    #[test]
    fn missing_file_reports_zero_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), &["x"]);
        app.file_path = dir.path().join("unsaved.txt");
        assert_eq!(app.file_size_label(), "0 B");
        app.save().unwrap();
        assert_eq!(app.file_size_label(), "2.0 B");
    }

    #[test]
    fn sizes_use_binary_units() {
        assert_eq!(format_size(0), "0.0 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
