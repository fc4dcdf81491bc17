//! Matrix element type constraints
//!
//! Every type that can be stored in a matrix maps to exactly one
//! [`DataType`] tag and is plain-old-data, so payloads can be viewed as raw
//! little-endian bytes without copying on little-endian hosts.

use crate::format::DataType;

/// Trait for types that can be stored as matrix elements
pub trait MatrixElement:
    bytemuck::Pod + PartialEq + core::fmt::Debug + Send + Sync + 'static
{
    /// The tag stored alongside the payload
    fn data_type() -> DataType;

    /// Widen to f64 for type-erased access
    fn to_f64(self) -> f64;

    /// Read one element from little-endian bytes
    ///
    /// `bytes` must be exactly `size_of::<Self>()` long.
    fn from_le_slice(bytes: &[u8]) -> Self;

    /// Get the size in bytes of this element type
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }
}

macro_rules! impl_matrix_element {
    ($ty:ty, $dtype:expr) => {
        impl MatrixElement for $ty {
            fn data_type() -> DataType {
                $dtype
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_le_slice(bytes: &[u8]) -> Self {
                let mut buf = [0u8; core::mem::size_of::<$ty>()];
                buf.copy_from_slice(bytes);
                <$ty>::from_le_bytes(buf)
            }
        }
    };
}

impl_matrix_element!(f32, DataType::F32);
impl_matrix_element!(f64, DataType::F64);
impl_matrix_element!(i32, DataType::I32);
impl_matrix_element!(i64, DataType::I64);
impl_matrix_element!(u32, DataType::U32);
impl_matrix_element!(u64, DataType::U64);
