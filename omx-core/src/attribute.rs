//! Attribute values and ordered attribute maps
//!
//! Matrix attributes are scalars only ([`Scalar`]). Storage-level attributes
//! ([`AttrValue`]) additionally carry integer arrays, which the container uses
//! for the persisted `SHAPE`.

use alloc::string::String;
use alloc::vec::Vec;

/// A scalar attribute value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(#[cfg_attr(feature = "serde", serde(with = "float_repr"))] f64),
}

/// Floats that JSON cannot hold (NaN, infinities) are written as strings
#[cfg(feature = "serde")]
mod float_repr {
    use core::fmt;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    const NAN: &str = "NaN";
    const INF: &str = "inf";
    const NEG_INF: &str = "-inf";

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str(NAN)
        } else if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { INF } else { NEG_INF })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(FloatVisitor)
    }

    struct FloatVisitor;

    impl Visitor<'_> for FloatVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "a number or one of \"{NAN}\", \"{INF}\", \"{NEG_INF}\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            match v {
                NAN => Ok(f64::NAN),
                INF => Ok(f64::INFINITY),
                NEG_INF => Ok(f64::NEG_INFINITY),
                other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }
    }
}

impl Scalar {
    /// String contents, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer contents, if this is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float contents, if this is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.into())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value.into())
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Int(value.into())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(value.into())
    }
}

impl core::fmt::Display for Scalar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Scalar::Str(s) => write!(f, "{s}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
        }
    }
}

/// An attribute value as held by a storage engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttrValue {
    Scalar(Scalar),
    IntArray(Vec<i64>),
}

impl AttrValue {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            AttrValue::Scalar(s) => Some(s),
            AttrValue::IntArray(_) => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i64]> {
        match self {
            AttrValue::IntArray(v) => Some(v),
            AttrValue::Scalar(_) => None,
        }
    }
}

impl From<Scalar> for AttrValue {
    fn from(value: Scalar) -> Self {
        AttrValue::Scalar(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Scalar(value.into())
    }
}

/// Insertion-ordered string-keyed attribute map
///
/// Setting an existing key replaces its value in place, so iteration order is
/// the order in which keys were first inserted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AttrMap<V> {
    entries: Vec<(String, V)>,
}

/// Matrix attribute bag
pub type Attributes = AttrMap<Scalar>;

impl<V> Default for AttrMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> AttrMap<V> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for AttrMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V> IntoIterator for AttrMap<V> {
    type Item = (String, V);
    type IntoIter = alloc::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut attrs = Attributes::new();
        attrs.insert("timeperiod", "am".into());
        attrs.insert("mode", "hwy".into());
        let previous = attrs.insert("timeperiod", "pm".into());

        assert_eq!(previous, Some(Scalar::from("am")));
        assert_eq!(attrs.keys().collect::<Vec<_>>(), vec!["timeperiod", "mode"]);
        assert_eq!(attrs.get("timeperiod"), Some(&Scalar::from("pm")));
    }

    #[test]
    fn test_remove() {
        let mut attrs: Attributes = [("a", Scalar::Int(1)), ("b", Scalar::Int(2))]
            .into_iter()
            .collect();
        assert_eq!(attrs.remove("a"), Some(Scalar::Int(1)));
        assert_eq!(attrs.remove("a"), None);
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_scalar_variants_are_distinct() {
        assert_ne!(Scalar::Int(1), Scalar::Float(1.0));
        assert_ne!(Scalar::from("1"), Scalar::Int(1));
        assert_eq!(Scalar::from(2.5f32), Scalar::Float(2.5));
    }

    #[test]
    fn test_attr_value_accessors() {
        let shape = AttrValue::IntArray(vec![5, 5]);
        assert_eq!(shape.as_int_array(), Some(&[5i64, 5][..]));
        assert!(shape.as_scalar().is_none());
        assert_eq!(AttrValue::from("0.2").as_scalar(), Some(&Scalar::from("0.2")));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_non_finite_floats_survive_json() {
        let attrs: Attributes = [
            ("nan", Scalar::Float(f64::NAN)),
            ("inf", Scalar::Float(f64::INFINITY)),
            ("neg_inf", Scalar::Float(f64::NEG_INFINITY)),
            ("plain", Scalar::Float(0.25)),
            ("label", Scalar::from("inf")),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&attrs).unwrap();
        assert!(!json.contains("null"));
        let back: Attributes = serde_json::from_str(&json).unwrap();

        assert!(back.get("nan").and_then(Scalar::as_float).unwrap().is_nan());
        assert_eq!(back.get("inf"), Some(&Scalar::Float(f64::INFINITY)));
        assert_eq!(back.get("neg_inf"), Some(&Scalar::Float(f64::NEG_INFINITY)));
        assert_eq!(back.get("plain"), Some(&Scalar::Float(0.25)));
        assert_eq!(back.get("label"), Some(&Scalar::from("inf")));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_unknown_float_string_is_rejected() {
        let result: Result<Scalar, _> = serde_json::from_str(r#"{"Float":"huge"}"#);
        assert!(result.is_err());
    }
}
