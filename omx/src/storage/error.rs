//! Errors raised at the storage-engine boundary

use omx_core::FormatError;
use thiserror::Error;

/// Storage engine errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// A mutation was attempted on a read-only handle
    #[error("storage is open read-only")]
    ReadOnly,

    /// The handle has already been closed
    #[error("storage handle is closed")]
    Closed,

    /// Group does not exist
    #[error("no such group: {0}")]
    NoSuchGroup(String),

    /// Group already exists
    #[error("group already exists: {0}")]
    GroupExists(String),

    /// Node does not exist
    #[error("no such node: {group}/{name}")]
    NoSuchNode {
        /// Group name
        group: String,
        /// Node name
        name: String,
    },

    /// Node already exists
    #[error("node already exists: {group}/{name}")]
    NodeExists {
        /// Group name
        group: String,
        /// Node name
        name: String,
    },

    /// Payload length disagrees with the declared dimensions
    #[error("payload of {len} elements does not fill dimensions {dims:?}")]
    DimensionMismatch {
        /// Declared dimensions
        dims: Vec<usize>,
        /// Payload element count
        len: usize,
    },

    /// Container bytes are inconsistent with their own index
    #[error("corrupted container: {0}")]
    Corrupted(String),

    /// Header or payload layout error
    #[error("format error: {0}")]
    Format(FormatError),

    /// Index (de)serialization error
    #[error("index serialization error: {0}")]
    Index(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FormatError> for StorageError {
    fn from(err: FormatError) -> Self {
        StorageError::Format(err)
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
