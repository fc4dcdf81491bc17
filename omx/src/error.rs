//! Container-level errors

use omx_core::{FormatError, Shape};
use thiserror::Error;

use crate::storage::StorageError;

/// Which namespace a name was looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Matrix,
    Mapping,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Matrix => write!(f, "matrix"),
            NodeKind::Mapping => write!(f, "mapping"),
        }
    }
}

/// Errors raised by container operations
#[derive(Debug, Error)]
pub enum OmxError {
    /// No matrix or mapping with this name
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Namespace searched
        kind: NodeKind,
        /// Requested name
        name: String,
    },

    /// A matrix with this name already exists
    #[error("matrix {0} already exists")]
    DuplicateName(String),

    /// A mapping with this name already exists and overwrite was not requested
    #[error("mapping {0} already exists; pass overwrite to replace it")]
    DuplicateMapping(String),

    /// Matrix shape differs from the container shape
    #[error("matrix {name} has shape {found}, container shape is {expected}")]
    ShapeMismatch {
        /// Offending matrix name
        name: String,
        /// Established container shape
        expected: Shape,
        /// Shape that was supplied
        found: Shape,
    },

    /// Mapping length matches neither container dimension
    #[error("mapping {name} has {len} entries, which fits neither dimension of {shape}")]
    MappingLength {
        /// Offending mapping name
        name: String,
        /// Supplied entry count
        len: usize,
        /// Established container shape
        shape: Shape,
    },

    /// The container is open read-only
    #[error("container is open read-only")]
    ReadOnly,

    /// Name fails node naming rules
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    /// Caller supplied malformed matrix data
    #[error("invalid matrix data: {0}")]
    InvalidData(String),

    /// Layout or parsing error from the core crate
    #[error("format error: {0}")]
    Format(FormatError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// Any other engine failure
    #[error("storage error: {0}")]
    Storage(#[source] StorageError),
}

impl OmxError {
    pub(crate) fn matrix_not_found(name: &str) -> Self {
        OmxError::NotFound {
            kind: NodeKind::Matrix,
            name: name.to_string(),
        }
    }

    pub(crate) fn mapping_not_found(name: &str) -> Self {
        OmxError::NotFound {
            kind: NodeKind::Mapping,
            name: name.to_string(),
        }
    }

    /// Either form of shape disagreement
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(
            self,
            OmxError::ShapeMismatch { .. } | OmxError::MappingLength { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, OmxError::NotFound { .. })
    }
}

impl From<StorageError> for OmxError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ReadOnly => OmxError::ReadOnly,
            other => OmxError::Storage(other),
        }
    }
}

impl From<FormatError> for OmxError {
    fn from(err: FormatError) -> Self {
        OmxError::Format(err)
    }
}

/// Result type for container operations
pub type OmxResult<T> = Result<T, OmxError>;
