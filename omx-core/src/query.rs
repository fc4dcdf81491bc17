//! Conjunctive exact-match predicates over matrix attributes

use alloc::string::String;
use alloc::vec::Vec;

use crate::attribute::{Attributes, Scalar};

/// An ordered set of `key == value` terms that must all hold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    terms: Vec<(String, Scalar)>,
}

impl Predicate {
    /// Create an empty predicate, which matches every matrix
    pub const fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a term; a repeated key replaces the earlier value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.terms.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.terms.push((key, value)),
        }
        self
    }

    pub fn terms(&self) -> &[(String, Scalar)] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Predicate {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Predicate::new(), |p, (k, v)| p.with(k, v))
    }
}

/// True iff every predicate key is present with an exactly equal value
///
/// Values compare by variant and value, so `Int(1)` does not match
/// `Float(1.0)`. Extra attributes on the matrix are ignored.
pub fn matches(attributes: &Attributes, predicate: &Predicate) -> bool {
    predicate
        .terms()
        .iter()
        .all(|(key, value)| attributes.get(key) == Some(value))
}
