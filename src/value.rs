//! Stored value model.
//!
//! Preferences are loosely typed: a slot holds whatever was last written,
//! and readers ask for the type they expect. `Value` covers the
//! property-list shapes a platform defaults store accepts: booleans,
//! integers, floats, strings, binary blobs, arrays, and string-keyed
//! dictionaries.
//!
//! There is intentionally no null variant. The store never holds a null
//! marker; absence is expressed by removing the key (see
//! [`Pref::set`](crate::Pref::set) for how optional bindings route through
//! the remove path).
//!
//! ## Equality rules
//!
//! - Different types are never equal (no type coercion)
//! - `Int(1)` != `Float(1.0)`
//! - `String("abc")` != `Bytes([97, 98, 99])`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A loosely typed preferences value.
///
/// All store and binding operations traffic in this type. Typed access is
/// best-effort via the `as_*` accessors; a mismatch yields `None`, never an
/// error or an implicit conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean true or false.
    Bool(bool),

    /// 64-bit signed integer.
    Int(i64),

    /// 64-bit IEEE-754 floating point.
    Float(f64),

    /// UTF-8 encoded string.
    String(String),

    /// Arbitrary binary data. Distinct from `String`.
    Bytes(Vec<u8>),

    /// Ordered sequence of values.
    Array(Vec<Value>),

    /// String-keyed map of values.
    Dict(HashMap<String, Value>),
}

impl Value {
    /// Returns the type name as a string (for diagnostics).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Array(_) => "Array",
            Value::Dict(_) => "Dict",
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get as string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as bytes slice.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get as array slice.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Try to get as dictionary reference.
    pub fn as_dict(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(d: HashMap<String, Value>) -> Self {
        Value::Dict(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_are_unique() {
        let values = vec![
            Value::Bool(true),
            Value::Int(0),
            Value::Float(0.0),
            Value::String(String::new()),
            Value::Bytes(vec![]),
            Value::Array(vec![]),
            Value::Dict(HashMap::new()),
        ];

        let names: std::collections::HashSet<_> =
            values.iter().map(|v| v.type_name()).collect();
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn accessors_match_variant_only() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(1).as_bool(), None);

        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Float(42.0).as_int(), None);

        assert_eq!(Value::Float(1.5).as_float(), Some(1.5));
        assert_eq!(Value::Int(1).as_float(), None);

        assert_eq!(Value::String("hi".to_string()).as_str(), Some("hi"));
        assert_eq!(Value::Bytes(b"hi".to_vec()).as_str(), None);
    }

    #[test]
    fn no_cross_type_equality() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Bool(true), Value::Int(1));
        assert_ne!(
            Value::String("abc".to_string()),
            Value::Bytes(vec![97, 98, 99])
        );
        assert_ne!(Value::String("123".to_string()), Value::Int(123));
    }

    #[test]
    fn ieee_754_float_equality() {
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(Value::Float(-0.0), Value::Float(0.0));
        assert_eq!(Value::Float(f64::INFINITY), Value::Float(f64::INFINITY));
    }

    #[test]
    fn from_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(5i64), Value::Int(5));
        assert_eq!(Value::from(5i32), Value::Int(5));
        assert_eq!(Value::from(2.5), Value::Float(2.5));
        assert_eq!(Value::from("a"), Value::String("a".to_string()));
        assert_eq!(Value::from(vec![1u8, 2]), Value::Bytes(vec![1, 2]));
    }

    #[test]
    fn serde_roundtrip_all_variants() {
        let mut dict = HashMap::new();
        dict.insert("n".to_string(), Value::Int(1));

        let values = vec![
            Value::Bool(false),
            Value::Int(-7),
            Value::Float(3.25),
            Value::String("こんにちは".to_string()),
            Value::Bytes(vec![0, 255, 128]),
            Value::Array(vec![Value::Int(1), Value::String("a".to_string())]),
            Value::Dict(dict),
        ];

        for value in values {
            let serialized = serde_json::to_string(&value).unwrap();
            let deserialized: Value = serde_json::from_str(&serialized).unwrap();
            assert_eq!(value, deserialized);
        }
    }
}
