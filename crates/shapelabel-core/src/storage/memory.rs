//! In-memory label store.

use super::{LabelStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryLabelStore {
    files: RwLock<HashMap<String, String>>,
}

impl MemoryLabelStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.read().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LabelStore for MemoryLabelStore {
    fn read(&self, name: &str) -> StorageResult<Option<String>> {
        let files = self
            .files
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(files.get(name).cloned())
    }

    fn write(&self, name: &str, contents: &str) -> StorageResult<()> {
        let mut files = self
            .files
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        files.insert(name.to_string(), contents.to_string());
        Ok(())
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        let files = self
            .files
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(files.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_write_read() {
        let store = MemoryLabelStore::new();
        assert!(store.is_empty());
        assert_eq!(store.read("a.txt").unwrap(), None);

        store.write("a.txt", "0\n").unwrap();
        assert_eq!(store.read("a.txt").unwrap().as_deref(), Some("0\n"));
        assert!(store.exists("a.txt").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryLabelStore::new();
        store.write("a.txt", "first").unwrap();
        store.write("a.txt", "second").unwrap();
        assert_eq!(store.read("a.txt").unwrap().as_deref(), Some("second"));
        assert_eq!(store.len(), 1);
    }
}
