//! Layout definitions for OMX containers
//!
//! `constants` fixes the group and attribute names every engine must use.
//! `header` defines the fixed header of the single-file engine and the
//! element type tags shared by all engines.

pub mod constants;
pub mod header;

pub use header::{DataType, FileHeader};
