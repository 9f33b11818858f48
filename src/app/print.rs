use std::io::Write;
use std::process::{Command, Stdio};

use tracing::info;

use super::error::EditorError;

pub const DEFAULT_PRINT_COMMAND: &str = "lpr";

pub trait PrintSpooler {
    fn send(&mut self, text: &str) -> Result<(), EditorError>;
}

/// Hands the document to an external print command as a temporary file.
///
/// The file is created owner-only and removed once the command returns,
/// whatever its outcome.
#[derive(Debug, Clone)]
pub struct CommandSpooler {
    program: String,
    args: Vec<String>,
}

impl CommandSpooler {
    pub fn new(command_line: &str) -> Self {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .unwrap_or_else(|| DEFAULT_PRINT_COMMAND.to_string());
        Self {
            program,
            args: parts.collect(),
        }
    }
}

impl PrintSpooler for CommandSpooler {
    fn send(&mut self, text: &str) -> Result<(), EditorError> {
        let failed = |e: std::io::Error| EditorError::PrintFailed(e.to_string());
        let mut file = tempfile::Builder::new()
            .prefix("nemo_print_")
            .tempfile()
            .map_err(failed)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o600))
                .map_err(failed)?;
        }
        file.write_all(text.as_bytes()).map_err(failed)?;
        file.flush().map_err(failed)?;

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| EditorError::PrintFailed(format!("{}: {}", self.program, e)))?;
        info!(target: "print", program = %self.program, %status, "spooled");
        if status.success() {
            Ok(())
        } else {
            Err(EditorError::PrintFailed(format!(
                "{} exited with {}",
                self.program, status
            )))
        }
    }
}
