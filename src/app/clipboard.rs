use tracing::warn;

use super::error::EditorError;

pub trait Clipboard {
    /// Clipboard contents. An empty clipboard is reported as unavailable.
    fn get_text(&mut self) -> Result<String, EditorError>;
    fn set_text(&mut self, text: &str) -> Result<(), EditorError>;
}

/// The desktop clipboard. The handle is opened lazily and kept alive, since on
/// X11 the copied text only survives while its owner does.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, EditorError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|e| {
                warn!(target: "clipboard", error = %e, "open_failed");
                EditorError::ClipboardUnavailable(e.to_string())
            })?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| EditorError::ClipboardUnavailable("no clipboard provider".to_string()))
    }
}

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Result<String, EditorError> {
        let text = self.handle()?.get_text().map_err(|e| match e {
            arboard::Error::ContentNotAvailable => {
                EditorError::ClipboardUnavailable("clipboard is empty".to_string())
            }
            other => EditorError::ClipboardUnavailable(other.to_string()),
        })?;
        if text.is_empty() {
            return Err(EditorError::ClipboardUnavailable(
                "clipboard is empty".to_string(),
            ));
        }
        Ok(text)
    }

    fn set_text(&mut self, text: &str) -> Result<(), EditorError> {
        self.handle()?
            .set_text(text.to_owned())
            .map_err(|e| EditorError::ClipboardUnavailable(e.to_string()))
    }
}
