#![no_std]

//! OMX Core - Open Matrix container format definitions
//!
//! This crate provides the pure, I/O-free half of the OMX container: the
//! canonical [`Shape`], attribute value types, predicate matching, mapping
//! reverse lookups, element type tags and the single-file header layout.
//!
//! Storage engines and the container façade live in the `omx` crate.

extern crate alloc;

pub mod attribute;
pub mod error;
pub mod format;
pub mod mapping;
pub mod query;
pub mod shape;
pub mod traits;
pub mod validation;

pub use attribute::{AttrMap, AttrValue, Attributes, Scalar};
pub use error::*;
pub use format::{DataType, FileHeader};
pub use mapping::{first_duplicate, reverse_lookup, ReverseLookup};
pub use query::{matches, Predicate};
pub use shape::Shape;
pub use traits::MatrixElement;
pub use validation::{parse_predicate_term, parse_scalar, parse_shape, validate_name};
