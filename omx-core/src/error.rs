//! Error types for OMX format definitions

/// Errors raised by the pure format layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// Invalid container header
    InvalidHeader,
    /// Unsupported container format version
    UnsupportedVersion,
    /// Payload or index does not agree with its declared layout
    CorruptedData,
    /// Insufficient buffer space
    InsufficientBuffer,
    /// Size calculation overflowed
    SizeOverflow,
    /// Shape is not a valid (rows, cols) pair
    InvalidShape,
    /// Node name is empty or contains forbidden characters
    InvalidName,
    /// Predicate term is not of the form `key=value`
    InvalidPredicate,
}

impl core::fmt::Display for FormatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            FormatError::InvalidHeader => "Invalid OMX container header",
            FormatError::UnsupportedVersion => "Unsupported container format version",
            FormatError::CorruptedData => "Data corruption detected",
            FormatError::InsufficientBuffer => "Insufficient buffer space",
            FormatError::SizeOverflow => "Size calculation overflow",
            FormatError::InvalidShape => "Invalid matrix shape",
            FormatError::InvalidName => "Invalid node name",
            FormatError::InvalidPredicate => "Invalid predicate term",
        };
        write!(f, "{msg}")
    }
}

/// Result type for format operations
pub type Result<T> = core::result::Result<T, FormatError>;
