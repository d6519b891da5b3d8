//! File-backed key-value storage.
//!
//! Each key maps to `<root>/<key>.json`. Writes land in a temp file in the same
//! directory and are renamed over the target, so readers see either the old
//! value or the new one.

use super::backend::{BackendType, KeyValueBackend};
use crate::{Error, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Directory of JSON files, one per key.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }
}

/// Keys become file names, so keep them to a portable character set.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("invalid storage key: {:?}", key)))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn backend_type(&self) -> &'static str {
        BackendType::File.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_missing_key_is_none() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path());
        assert_eq!(backend.get("todos").unwrap(), None);
    }

    #[test]
    fn test_set_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("data");
        let mut backend = FileBackend::new(&root);

        backend.set("todos", "[]").unwrap();

        assert!(root.join("todos.json").exists());
        assert_eq!(backend.get("todos").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let temp = TempDir::new().unwrap();
        let mut backend = FileBackend::new(temp.path());

        backend.set("currentUser", "alice").unwrap();
        backend.set("currentUser", "bob").unwrap();

        assert_eq!(backend.get("currentUser").unwrap().as_deref(), Some("bob"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let mut backend = FileBackend::new(temp.path());

        backend.set("currentUser", "alice").unwrap();
        backend.remove("currentUser").unwrap();
        backend.remove("currentUser").unwrap();

        assert_eq!(backend.get("currentUser").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp = TempDir::new().unwrap();
        let mut backend = FileBackend::new(temp.path());

        assert!(backend.set("../escape", "x").is_err());
        assert!(backend.get("a/b").is_err());
        assert!(backend.remove("").is_err());
    }

    #[test]
    fn test_location_and_type() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path());
        assert_eq!(backend.backend_type(), "file");
        assert_eq!(backend.location(), temp.path().display().to_string());
    }
}
