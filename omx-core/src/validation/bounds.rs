//! Payload size arithmetic with overflow protection

use crate::{DataType, FormatError, Result, Shape};

/// Bytes occupied by `count` elements of `dtype`
pub const fn expected_payload_size(count: usize, dtype: DataType) -> Result<usize> {
    match count.checked_mul(dtype.size_bytes()) {
        Some(size) => Ok(size),
        None => Err(FormatError::SizeOverflow),
    }
}

/// Check that a flat buffer of `len` elements fills `shape` exactly
pub fn validate_element_count(shape: Shape, len: usize) -> Result<()> {
    let expected = shape.element_count().ok_or(FormatError::SizeOverflow)?;
    if expected != len {
        return Err(FormatError::InvalidShape);
    }
    Ok(())
}

/// Number of elements in a payload of `byte_len` bytes
pub const fn element_count_for(byte_len: usize, dtype: DataType) -> Result<usize> {
    let size = dtype.size_bytes();
    if byte_len % size != 0 {
        return Err(FormatError::CorruptedData);
    }
    Ok(byte_len / size)
}
