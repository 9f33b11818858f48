use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Error: No permission to access {} :(", .0.display())]
    AccessDenied(PathBuf),

    #[error("Error: Invalid file path {} :(", .0.display())]
    UnsafePath(PathBuf),

    #[error("Error: File {} doesn't exist! :(", .0.display())]
    NotFound(PathBuf),

    #[error("Error: Nothing to undo! :(")]
    NothingToUndo,

    #[error("Error: Nothing to redo! :(")]
    NothingToRedo,

    #[error("Error: Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    #[error("Error: Failed to send document to the printer: {0}")]
    PrintFailed(String),

    #[error("Error: Cannot rename to {} :(", .0.display())]
    RenameConflict(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
