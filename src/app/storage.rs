use std::fs;
use std::io;
use std::path::Path;

use nix::unistd::{AccessFlags, access};

/// File-system access the editor performs, with the permission and path
/// safety checks it runs before every read, write or rename.
pub trait Storage {
    fn exists(&self, path: &Path) -> bool;
    fn readable(&self, path: &Path) -> bool;
    fn writable(&self, path: &Path) -> bool;
    /// Rejects parent-directory traversal and absolute paths outside the
    /// allowed directories.
    fn is_safe(&self, path: &Path) -> bool;
    fn size(&self, path: &Path) -> Option<u64>;
    /// Invalid UTF-8 is replaced rather than rejected.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn remove(&self, path: &Path) -> io::Result<()>;
}

pub const DEFAULT_SAFE_DIRS: [&str; 3] = ["/home/", "/tmp/", "/var/tmp/"];

#[derive(Debug, Clone)]
pub struct FsStorage {
    safe_dirs: Vec<String>,
}

impl Default for FsStorage {
    fn default() -> Self {
        Self::new(DEFAULT_SAFE_DIRS.iter().map(|d| d.to_string()).collect())
    }
}

impl FsStorage {
    pub fn new(safe_dirs: Vec<String>) -> Self {
        Self { safe_dirs }
    }
}

impl Storage for FsStorage {
    fn exists(&self, path: &Path) -> bool {
        access(path, AccessFlags::F_OK).is_ok()
    }

    fn readable(&self, path: &Path) -> bool {
        access(path, AccessFlags::R_OK).is_ok()
    }

    fn writable(&self, path: &Path) -> bool {
        access(path, AccessFlags::W_OK).is_ok()
    }

    fn is_safe(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        if text.is_empty() || text == ".." || text.contains("../") || text.contains("/..") {
            return false;
        }
        if text.starts_with('/') {
            return self.safe_dirs.iter().any(|dir| text.starts_with(dir.as_str()));
        }
        true
    }

    fn size(&self, path: &Path) -> Option<u64> {
        fs::metadata(path).ok().map(|m| m.len())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_is_unsafe() {
        let storage = FsStorage::default();
        assert!(!storage.is_safe(Path::new("../secret")));
        assert!(!storage.is_safe(Path::new("notes/../../etc/passwd")));
        assert!(!storage.is_safe(Path::new("notes/..")));
        assert!(!storage.is_safe(Path::new("..")));
        assert!(!storage.is_safe(Path::new("")));
    }

    #[test]
    fn absolute_paths_need_an_allowed_prefix() {
        let storage = FsStorage::default();
        assert!(storage.is_safe(Path::new("/tmp/notes.txt")));
        assert!(storage.is_safe(Path::new("/home/me/notes.txt")));
        assert!(!storage.is_safe(Path::new("/etc/passwd")));
        assert!(storage.is_safe(Path::new("notes.txt")));
        assert!(storage.is_safe(Path::new("dir/notes.txt")));
    }

    #[test]
    fn permission_checks_follow_the_file_system() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let storage = FsStorage::default();
        assert!(!storage.exists(&path));
        assert!(storage.writable(dir.path()));
        storage.write(&path, "hi\n").unwrap();
        assert!(storage.exists(&path));
        assert!(storage.readable(&path));
        assert_eq!(storage.size(&path), Some(3));
        let moved = dir.path().join("b.txt");
        storage.rename(&path, &moved).unwrap();
        assert!(!storage.exists(&path));
        storage.remove(&moved).unwrap();
        assert!(!storage.exists(&moved));
    }
}
