//! Validation and parsing utilities
//!
//! Pure functions with no I/O: node name rules, payload size arithmetic,
//! alignment, and parsing of the textual forms used by tools and configs.

pub mod bounds;
pub mod format;
pub mod names;
pub mod parsing;

pub use bounds::{expected_payload_size, validate_element_count};
pub use format::{align_to_8, align_to_boundary};
pub use names::validate_name;
pub use parsing::{parse_predicate_term, parse_scalar, parse_shape};
