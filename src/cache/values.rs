//! Value Module
//!
//! The small fixed set of scalar payload types the cache accepts, with
//! conversions to the byte form stored in the backend and the textual form
//! recorded in call history.

use std::fmt;

// == Value ==
/// A payload accepted by [`Cache::store`](crate::cache::Cache::store).
///
/// Numbers are stored as their decimal text, matching how the backing store
/// treats integers, so a stored `Int` can be read back with `get_int`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Signed integer
    Int(i64),
    /// Floating-point number
    Float(f64),
}

impl Value {
    /// Converts the payload into the byte form written to the store.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Value::Text(s) => s.into_bytes(),
            Value::Bytes(b) => b,
            Value::Int(i) => i.to_string().into_bytes(),
            Value::Float(x) => x.to_string().into_bytes(),
        }
    }
}

/// Textual rendering used for history records: text is quoted and escaped,
/// bytes use the `b"..."` form, numbers print plain.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

// == Conversions ==
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}
