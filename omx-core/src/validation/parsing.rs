//! Parsing utilities for the textual forms of shapes and predicates
//!
//! These are the forms accepted on command lines and in configuration files:
//! shapes as `"rows x cols"` and predicate terms as `key=value`.

use alloc::string::{String, ToString};

use crate::{FormatError, Scalar, Shape};

/// Parse a shape written as `"5x5"`, `"5X5"` or `"5,5"`
pub fn parse_shape(shape_str: &str) -> Result<Shape, FormatError> {
    let shape_str = shape_str.trim();
    let (rows, cols) = shape_str
        .split_once(|c: char| matches!(c, 'x' | 'X' | ','))
        .ok_or(FormatError::InvalidShape)?;

    let rows = parse_usize(rows.trim()).map_err(|_| FormatError::InvalidShape)?;
    let cols = parse_usize(cols.trim()).map_err(|_| FormatError::InvalidShape)?;

    Ok(Shape::new(rows, cols))
}

/// Parse a scalar value
///
/// Integers are tried first, then floats; anything else is a string. Wrapping
/// the value in single or double quotes forces a string.
pub fn parse_scalar(value: &str) -> Scalar {
    let value = value.trim();

    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return Scalar::Str(value[1..value.len() - 1].to_string());
        }
    }

    if let Ok(int) = value.parse::<i64>() {
        return Scalar::Int(int);
    }

    if let Ok(float) = value.parse::<f64>() {
        return Scalar::Float(float);
    }

    Scalar::Str(value.to_string())
}

/// Parse a predicate term written as `key=value`
pub fn parse_predicate_term(term: &str) -> Result<(String, Scalar), FormatError> {
    let (key, value) = term.split_once('=').ok_or(FormatError::InvalidPredicate)?;
    let key = key.trim();

    if key.is_empty() {
        return Err(FormatError::InvalidPredicate);
    }

    Ok((key.to_string(), parse_scalar(value)))
}

/// Parse a usize from a string with error handling
fn parse_usize(s: &str) -> Result<usize, FormatError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::InvalidShape);
    }

    s.parse::<usize>().map_err(|_| FormatError::SizeOverflow)
}
