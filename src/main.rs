mod app;
mod logging;
mod ui;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::prelude::*;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::app::{App, Config, FsStorage, Mode, Services, Storage, handle_key, load_config};
use crate::ui::ui;

const CLOCK_TICK: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(name = "nemo", version, about = "A small terminal text editor")]
struct Args {
    /// File to open; defaults to untitled.txt
    file: Option<PathBuf>,
    /// Delete FILE after confirmation and exit
    #[arg(long, value_name = "FILE")]
    delete: Option<PathBuf>,
    /// Print license information and exit
    #[arg(long)]
    license: bool,
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.license {
        println!("MIT License");
        return Ok(());
    }

    let (log_guard, config) = bootstrap()?;

    if let Some(path) = args.delete {
        let storage = FsStorage::new(config.safe_dirs.clone());
        let stdin = io::stdin();
        let code = delete_file(&path, &storage, &mut stdin.lock(), &mut io::stdout())?;
        drop(log_guard);
        std::process::exit(code);
    }

    let mut app = App::new(&config, Services::system(&config));
    app.startup(args.file);
    info!(target: "editor", "startup");

    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;
    let (cols, rows) = terminal::size()?;
    app.resize(cols, rows);

    loop {
        if app.take_redraw_request() {
            terminal.clear()?;
        }
        terminal.draw(|f| ui(f, &app))?;

        if app.mode == Mode::Clock && !event::poll(CLOCK_TICK)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if handle_key(&mut app, key)? {
                    break;
                }
            }
            Event::Resize(cols, rows) => app.resize(cols, rows),
            _ => {}
        }
    }

    info!(target: "editor", "exit");
    Ok(())
}

/// Logging comes up before the config is read so config events are kept.
fn bootstrap() -> Result<(Option<WorkerGuard>, Config)> {
    let guard = logging::init();
    logging::install_panic_hook();
    let config = load_config()?;
    Ok((guard, config))
}

/// Asks on `input` before removing `path`. Returns the process exit status.
fn delete_file(
    path: &Path,
    storage: &dyn Storage,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<i32> {
    if !storage.exists(path) {
        writeln!(out, "Error: File {} doesn't exist! :(", path.display())?;
        return Ok(1);
    }
    if !storage.writable(path) {
        writeln!(out, "Error: No permission to delete {} :(", path.display())?;
        return Ok(1);
    }
    write!(
        out,
        "Are you sure you want to delete {}? THIS ACTION CANNOT BE UNDONE! (Y/N): ",
        path.display()
    )?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    if !answer.trim().eq_ignore_ascii_case("y") {
        writeln!(out, "Deletion cancelled.")?;
        return Ok(0);
    }
    match storage.remove(path) {
        Ok(()) => {
            info!(target: "io", path = %path.display(), "deleted");
            writeln!(out, "File {} deleted successfully. :)", path.display())?;
            Ok(0)
        }
        Err(err) => {
            warn!(target: "io", path = %path.display(), error = %err, "delete_failed");
            writeln!(out, "Error: Could not delete {} :(", path.display())?;
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("victim.txt");
        std::fs::write(&path, "x").unwrap();
        let storage = FsStorage::default();

        let mut out = Vec::new();
        let code = delete_file(&path, &storage, &mut "n\n".as_bytes(), &mut out).unwrap();
        assert_eq!(code, 0);
        assert!(path.exists());

        let code = delete_file(&path, &storage, &mut "Y\n".as_bytes(), &mut out).unwrap();
        assert_eq!(code, 0);
        assert!(!path.exists());
    }

    #[test]
    fn delete_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let code = delete_file(
            &dir.path().join("ghost.txt"),
            &FsStorage::default(),
            &mut "y\n".as_bytes(),
            &mut out,
        )
        .unwrap();
        assert_eq!(code, 1);
        assert!(String::from_utf8(out).unwrap().contains("doesn't exist"));
    }

    #[test]
    fn config_warnings_reach_the_log_file() {
        let (guard, config) = bootstrap().unwrap();
        assert!(guard.is_some());
        let unknown = Config {
            theme: "no-such-theme".to_string(),
            ..config
        };
        unknown.resolve_theme();
        drop(guard);
        let log = std::fs::read_to_string(std::env::temp_dir().join("nemo.log")).unwrap();
        assert!(log.contains("unknown_theme"));
    }

    #[test]
    fn cli_parses_file_and_delete() {
        let args = Args::try_parse_from(["nemo", "notes.txt"]).unwrap();
        assert_eq!(args.file, Some(PathBuf::from("notes.txt")));
        let args = Args::try_parse_from(["nemo", "--delete", "old.txt"]).unwrap();
        assert_eq!(args.delete, Some(PathBuf::from("old.txt")));
        assert!(Args::try_parse_from(["nemo", "--bogus"]).is_err());
    }
}
