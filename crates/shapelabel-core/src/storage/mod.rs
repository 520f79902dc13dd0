//! Label file persistence.
//!
//! Stores deal in whole label-file texts keyed by file name; encoding and
//! decoding live in [`crate::codec`].

mod file;
mod memory;

pub use file::FileLabelStore;
pub use memory::MemoryLabelStore;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Backend holding one text file per image.
///
/// Writes always replace the whole file.
pub trait LabelStore: Send + Sync {
    /// Read a label file, `None` if it does not exist.
    fn read(&self, name: &str) -> StorageResult<Option<String>>;

    /// Replace a label file's contents.
    fn write(&self, name: &str, contents: &str) -> StorageResult<()>;

    /// Check if a label file exists.
    fn exists(&self, name: &str) -> StorageResult<bool>;
}
