//! Error types shared across the core.

use crate::storage::StorageError;
use thiserror::Error;

/// A single label line (or the header) could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown shape kind `{0}`")]
    UnknownShapeKind(String),
    #[error("malformed field `{0}`")]
    MalformedField(String),
    #[error("{kind} cannot be built from {found} numeric fields")]
    FieldCount { kind: &'static str, found: usize },
    #[error("missing shape count header")]
    MissingCount,
    #[error("header declares {declared} shapes but the file holds {found}")]
    CountMismatch { declared: usize, found: usize },
}

/// Errors raised by the annotation core.
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// A shape was driven through a transition its state does not allow.
    #[error("invalid shape state: {0}")]
    InvalidState(&'static str),
    /// An index into the annotation set was out of range.
    #[error("index {index} out of range for {len} shapes")]
    Index { index: usize, len: usize },
    /// A label file line could not be parsed (1-based line number).
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },
    /// The annotation set changed but no label file is bound to save it to.
    #[error("change not saved: no label file is bound to the current image")]
    Unbound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AnnotationError {
    /// Whether the error means the UI and the core have fallen out of sync.
    ///
    /// Parse, storage and unbound-save errors are scoped to one file and are
    /// surfaced to the user instead.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidState(_) | Self::Index { .. })
    }

    /// The parse failure behind this error, if any.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, AnnotationError>;
