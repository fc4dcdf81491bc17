//! The canonical (rows, cols) shape shared by every matrix in a container

use crate::{FormatError, Result};

/// Matrix dimensions as (rows, cols)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl Shape {
    /// Create a new shape
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Number of elements a matrix of this shape holds, `None` on overflow
    pub const fn element_count(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// A mapping must index either the rows or the columns
    pub const fn accepts_mapping_len(&self, len: usize) -> bool {
        len == self.rows || len == self.cols
    }

    /// Dimensions as an array, in storage order
    pub const fn dims(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Build a shape from engine dimensions; anything but 2-D is rejected
    pub fn from_dims(dims: &[usize]) -> Result<Self> {
        match dims {
            [rows, cols] => Ok(Self::new(*rows, *cols)),
            _ => Err(FormatError::InvalidShape),
        }
    }

    /// Encode as the persisted `SHAPE` attribute value
    pub fn to_attr(&self) -> [i64; 2] {
        [self.rows as i64, self.cols as i64]
    }

    /// Decode the persisted `SHAPE` attribute value
    pub fn from_attr(values: &[i64]) -> Result<Self> {
        match values {
            [rows, cols] if *rows >= 0 && *cols >= 0 => {
                Ok(Self::new(*rows as usize, *cols as usize))
            }
            _ => Err(FormatError::InvalidShape),
        }
    }
}

impl From<(usize, usize)> for Shape {
    fn from((rows, cols): (usize, usize)) -> Self {
        Self::new(rows, cols)
    }
}

impl core::fmt::Display for Shape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
