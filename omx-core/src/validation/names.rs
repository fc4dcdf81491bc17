//! Node name rules shared by the matrix and mapping namespaces

use crate::format::constants::MAX_NAME_LEN;
use crate::FormatError;

/// Validate a matrix or mapping name
///
/// Names must be non-empty, at most 255 bytes, and free of `/` (the group
/// separator) and control characters.
pub fn validate_name(name: &str) -> Result<(), FormatError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(FormatError::InvalidName);
    }

    if name.chars().any(|c| c == '/' || c.is_control()) {
        return Err(FormatError::InvalidName);
    }

    Ok(())
}
