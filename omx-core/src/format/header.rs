//! Single-file container header and element type tags
//!
//! ```text
//! offset  size  field
//!      0     4  magic "OMXF"
//!      4     1  version
//!      5     3  padding
//!      8     8  index offset (u64 LE)
//!     16     8  index size (u64 LE)
//!     24     8  reserved
//! ```
//!
//! Array payloads follow the header, each aligned to 8 bytes. The index is a
//! JSON document placed after the last payload.

use crate::error::{FormatError, Result};

/// Fixed 32-byte header of a single-file container
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Magic bytes: "OMXF"
    pub magic: [u8; 4],
    /// Layout version
    pub version: u8,
    /// Padding for alignment
    pub _padding: [u8; 3],
    /// Offset of the JSON index from file start
    pub index_offset: u64,
    /// Size of the JSON index in bytes
    pub index_size: u64,
    /// Reserved for future extensions
    pub reserved: [u8; 8],
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileHeader {
    /// Magic bytes for single-file containers
    pub const MAGIC: [u8; 4] = *b"OMXF";

    /// Current layout version
    pub const VERSION: u8 = 1;

    /// Size of the header in bytes
    pub const SIZE: usize = 32;

    /// Create a header with no index
    pub const fn new() -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            _padding: [0; 3],
            index_offset: 0,
            index_size: 0,
            reserved: [0; 8],
        }
    }

    /// Validate the header magic and version
    pub fn is_valid(&self) -> bool {
        self.magic == Self::MAGIC && self.version <= Self::VERSION
    }

    /// Parse a header from the start of a file
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(FormatError::InsufficientBuffer);
        }

        if bytes[0..4] != Self::MAGIC {
            return Err(FormatError::InvalidHeader);
        }

        let version = bytes[4];
        if version > Self::VERSION {
            return Err(FormatError::UnsupportedVersion);
        }

        let mut header = Self::new();
        header.version = version;
        header.index_offset = read_u64(&bytes[8..16])?;
        header.index_size = read_u64(&bytes[16..24])?;
        header.reserved.copy_from_slice(&bytes[24..32]);

        if header.index_offset < Self::SIZE as u64 {
            return Err(FormatError::InvalidHeader);
        }

        Ok(header)
    }

    /// Convert header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        // padding bytes remain zero
        bytes[8..16].copy_from_slice(&self.index_offset.to_le_bytes());
        bytes[16..24].copy_from_slice(&self.index_size.to_le_bytes());
        bytes[24..32].copy_from_slice(&self.reserved);
        bytes
    }

    /// Byte range of the index, checked against the file length
    pub fn index_range(&self, file_len: usize) -> Result<core::ops::Range<usize>> {
        let start = usize::try_from(self.index_offset).map_err(|_| FormatError::SizeOverflow)?;
        let size = usize::try_from(self.index_size).map_err(|_| FormatError::SizeOverflow)?;
        let end = start.checked_add(size).ok_or(FormatError::SizeOverflow)?;

        if end > file_len {
            return Err(FormatError::CorruptedData);
        }

        Ok(start..end)
    }
}

fn read_u64(bytes: &[u8]) -> Result<u64> {
    let array: [u8; 8] = bytes
        .try_into()
        .map_err(|_| FormatError::InsufficientBuffer)?;
    Ok(u64::from_le_bytes(array))
}

/// Element types a matrix or mapping may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum DataType {
    F32 = 0,
    F64 = 1,
    I32 = 2,
    I64 = 3,
    U32 = 4,
    U64 = 5,
}

impl DataType {
    /// Get the size in bytes for this data type
    pub const fn size_bytes(&self) -> usize {
        match self {
            DataType::F32 | DataType::I32 | DataType::U32 => 4,
            DataType::F64 | DataType::I64 | DataType::U64 => 8,
        }
    }

    /// Lowercase type name, e.g. `"f64"`
    pub const fn name(&self) -> &'static str {
        match self {
            DataType::F32 => "f32",
            DataType::F64 => "f64",
            DataType::I32 => "i32",
            DataType::I64 => "i64",
            DataType::U32 => "u32",
            DataType::U64 => "u64",
        }
    }
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}
