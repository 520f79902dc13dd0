//! File-based label store.

use super::{LabelStore, StorageError, StorageResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Label files kept as plain text in one directory.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a crash never leaves a half-written label file.
pub struct FileLabelStore {
    /// Directory holding the label files.
    base_path: PathBuf,
}

impl FileLabelStore {
    /// Create a store rooted at `base_path`.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create label directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Path of the label file called `name`.
    pub fn label_path(&self, name: &str) -> PathBuf {
        // Names come from image file stems; keep them inside the directory.
        let safe: String = name
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.base_path.join(safe)
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl LabelStore for FileLabelStore {
    fn read(&self, name: &str) -> StorageResult<Option<String>> {
        let path = self.label_path(name);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))
    }

    fn write(&self, name: &str, contents: &str) -> StorageResult<()> {
        let path = self.label_path(name);
        let io_err =
            |e: std::io::Error| StorageError::Io(format!("Failed to write {}: {}", path.display(), e));

        let mut tmp = NamedTempFile::new_in(&self.base_path).map_err(io_err)?;
        tmp.write_all(contents.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        Ok(self.label_path(name).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_write_read() {
        let dir = tempdir().unwrap();
        let store = FileLabelStore::new(dir.path().to_path_buf()).unwrap();

        store.write("img1.txt", "1\nCIRC 20 10 10\n").unwrap();
        let loaded = store.read("img1.txt").unwrap();
        assert_eq!(loaded.as_deref(), Some("1\nCIRC 20 10 10\n"));
        assert!(dir.path().join("img1.txt").exists());
    }

    #[test]
    fn test_file_store_missing_is_none() {
        let dir = tempdir().unwrap();
        let store = FileLabelStore::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.read("absent.txt").unwrap(), None);
        assert!(!store.exists("absent.txt").unwrap());
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempdir().unwrap();
        let labels = dir.path().join("labels").join("set1");
        let store = FileLabelStore::new(labels.clone()).unwrap();
        assert!(labels.is_dir());
        assert_eq!(store.base_path(), labels.as_path());
    }

    #[test]
    fn test_file_store_replaces_whole_file() {
        let dir = tempdir().unwrap();
        let store = FileLabelStore::new(dir.path().to_path_buf()).unwrap();
        store.write("a.txt", "2\nCIRC 1 1 1\nCIRC 2 2 2\n").unwrap();
        store.write("a.txt", "0\n").unwrap();
        assert_eq!(store.read("a.txt").unwrap().as_deref(), Some("0\n"));
        // no temporary files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_file_store_sanitizes_name() {
        let dir = tempdir().unwrap();
        let store = FileLabelStore::new(dir.path().to_path_buf()).unwrap();
        store.write("../escape.txt", "0\n").unwrap();
        assert!(dir.path().join(".._escape.txt").exists());
    }
}
