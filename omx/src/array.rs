//! Typed array payloads and dense matrix input
//!
//! [`ArrayData`] is the type-erased payload an engine stores for one node.
//! [`MatrixData`] pairs a payload with its (rows, cols) shape and is what
//! callers hand to the container to create a matrix.

use omx_core::validation::bounds::{element_count_for, validate_element_count};
use omx_core::{DataType, FormatError, MatrixElement, Shape};

use crate::error::{OmxError, OmxResult};

/// Row-major payload of a single array node
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U32(Vec<u32>),
    U64(Vec<u64>),
}

macro_rules! dispatch {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            ArrayData::F32($v) => $body,
            ArrayData::F64($v) => $body,
            ArrayData::I32($v) => $body,
            ArrayData::I64($v) => $body,
            ArrayData::U32($v) => $body,
            ArrayData::U64($v) => $body,
        }
    };
}

impl ArrayData {
    /// Wrap a typed vector
    pub fn from_vec<T: MatrixElement>(values: Vec<T>) -> Self {
        // T is exactly the variant's element type, so the casts cannot fail
        match T::data_type() {
            DataType::F32 => ArrayData::F32(bytemuck::allocation::cast_vec(values)),
            DataType::F64 => ArrayData::F64(bytemuck::allocation::cast_vec(values)),
            DataType::I32 => ArrayData::I32(bytemuck::allocation::cast_vec(values)),
            DataType::I64 => ArrayData::I64(bytemuck::allocation::cast_vec(values)),
            DataType::U32 => ArrayData::U32(bytemuck::allocation::cast_vec(values)),
            DataType::U64 => ArrayData::U64(bytemuck::allocation::cast_vec(values)),
        }
    }

    /// A payload of `count` copies of `value`
    pub fn filled<T: MatrixElement>(count: usize, value: T) -> Self {
        Self::from_vec(vec![value; count])
    }

    pub fn data_type(&self) -> DataType {
        match self {
            ArrayData::F32(_) => DataType::F32,
            ArrayData::F64(_) => DataType::F64,
            ArrayData::I32(_) => DataType::I32,
            ArrayData::I64(_) => DataType::I64,
            ArrayData::U32(_) => DataType::U32,
            ArrayData::U64(_) => DataType::U64,
        }
    }

    pub fn len(&self) -> usize {
        dispatch!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Typed view, `None` if `T` is not the stored element type
    pub fn as_slice<T: MatrixElement>(&self) -> Option<&[T]> {
        if T::data_type() != self.data_type() {
            return None;
        }
        Some(dispatch!(self, v => bytemuck::cast_slice(v.as_slice())))
    }

    /// Element at a flat offset, widened to f64
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        dispatch!(self, v => v.get(index).copied().map(MatrixElement::to_f64))
    }

    /// Serialize as little-endian bytes
    pub fn to_le_bytes(&self) -> Vec<u8> {
        dispatch!(self, v => encode_le(v.as_slice()))
    }

    /// Deserialize little-endian bytes of the given element type
    pub fn from_le_bytes(dtype: DataType, bytes: &[u8]) -> Result<Self, FormatError> {
        element_count_for(bytes.len(), dtype)?;
        Ok(match dtype {
            DataType::F32 => ArrayData::F32(decode_le(bytes)),
            DataType::F64 => ArrayData::F64(decode_le(bytes)),
            DataType::I32 => ArrayData::I32(decode_le(bytes)),
            DataType::I64 => ArrayData::I64(decode_le(bytes)),
            DataType::U32 => ArrayData::U32(decode_le(bytes)),
            DataType::U64 => ArrayData::U64(decode_le(bytes)),
        })
    }
}

fn encode_le<T: MatrixElement>(values: &[T]) -> Vec<u8> {
    let mut bytes = bytemuck::cast_slice::<T, u8>(values).to_vec();
    if cfg!(target_endian = "big") {
        for chunk in bytes.chunks_exact_mut(T::size_bytes()) {
            chunk.reverse();
        }
    }
    bytes
}

fn decode_le<T: MatrixElement>(bytes: &[u8]) -> Vec<T> {
    if cfg!(target_endian = "little") {
        // copies into a freshly aligned buffer, so mmap alignment is irrelevant
        bytemuck::pod_collect_to_vec(bytes)
    } else {
        bytes
            .chunks_exact(T::size_bytes())
            .map(T::from_le_slice)
            .collect()
    }
}

/// A dense 2-D array: shape plus row-major payload
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixData {
    shape: Shape,
    values: ArrayData,
}

impl MatrixData {
    /// Wrap row-major values; the length must fill `shape` exactly
    pub fn new<T: MatrixElement>(shape: impl Into<Shape>, values: Vec<T>) -> OmxResult<Self> {
        Self::from_array(shape.into(), ArrayData::from_vec(values))
    }

    /// Wrap an untyped payload; the length must fill `shape` exactly
    pub fn from_array(shape: Shape, values: ArrayData) -> OmxResult<Self> {
        validate_element_count(shape, values.len()).map_err(|_| {
            OmxError::InvalidData(format!(
                "{} elements do not fill shape {shape}",
                values.len()
            ))
        })?;
        Ok(Self { shape, values })
    }

    /// A matrix with every element set to `value`
    pub fn filled<T: MatrixElement>(shape: impl Into<Shape>, value: T) -> OmxResult<Self> {
        let shape = shape.into();
        let count = shape
            .element_count()
            .ok_or_else(|| OmxError::InvalidData(format!("shape {shape} is too large")))?;
        Ok(Self {
            shape,
            values: ArrayData::filled(count, value),
        })
    }

    /// Build from rows; every row must have the same length
    pub fn from_rows<T: MatrixElement>(rows: Vec<Vec<T>>) -> OmxResult<Self> {
        let ncols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|row| row.len() != ncols) {
            return Err(OmxError::InvalidData(format!(
                "row {bad} has {} columns, expected {ncols}",
                rows[bad].len()
            )));
        }
        let shape = Shape::new(rows.len(), ncols);
        Ok(Self {
            shape,
            values: ArrayData::from_vec(rows.into_iter().flatten().collect()),
        })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn data_type(&self) -> DataType {
        self.values.data_type()
    }

    pub fn values(&self) -> &ArrayData {
        &self.values
    }

    pub fn into_values(self) -> ArrayData {
        self.values
    }

    /// Typed row-major view, `None` if `T` is not the stored element type
    pub fn as_slice<T: MatrixElement>(&self) -> Option<&[T]> {
        self.values.as_slice()
    }

    /// Element at (row, col), widened to f64
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.shape.rows || col >= self.shape.cols {
            return None;
        }
        self.values.get_f64(row * self.shape.cols + col)
    }

    /// One row, widened to f64
    pub fn row(&self, row: usize) -> Option<Vec<f64>> {
        if row >= self.shape.rows {
            return None;
        }
        (0..self.shape.cols).map(|col| self.get(row, col)).collect()
    }

    /// One column, widened to f64
    pub fn col(&self, col: usize) -> Option<Vec<f64>> {
        if col >= self.shape.cols {
            return None;
        }
        (0..self.shape.rows).map(|row| self.get(row, col)).collect()
    }
}
