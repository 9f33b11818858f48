mod buffer;
mod clipboard;
mod config;
mod edit;
mod error;
mod file;
mod history;
mod input;
mod motion;
mod print;
mod storage;
mod theme;
mod types;

use clipboard::SystemClipboard;
use print::CommandSpooler;

pub use config::{Config, load_config};
pub use input::handle_key;
pub use storage::{FsStorage, Storage};
pub use types::{App, Mode, Services};
pub(crate) use types::normalize_range;

impl Services {
    /// The real desktop clipboard, print command and file system.
    pub fn system(config: &Config) -> Self {
        Self {
            storage: Box::new(FsStorage::new(config.safe_dirs.clone())),
            clipboard: Box::new(SystemClipboard::new()),
            spooler: Box::new(CommandSpooler::new(&config.print_command)),
        }
    }
}
