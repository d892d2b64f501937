//! Map keys.

use std::fmt;
use std::sync::Arc;

use super::Value;
use crate::errors::{unhashable_key, EvalError};

/// Hashable subset of [`Value`] usable as a map key.
///
/// Floats with an integral value normalize to `Int` so `m[1]` and `m[1.0]`
/// address the same entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapKey {
    Bool(bool),
    Int(i64),
    Str(Arc<str>),
}

impl MapKey {
    pub fn from_value(value: &Value) -> Result<MapKey, EvalError> {
        match value {
            Value::Bool(b) => Ok(MapKey::Bool(*b)),
            Value::Int(n) => Ok(MapKey::Int(*n)),
            Value::Float(f) => integral(*f)
                .map(MapKey::Int)
                .ok_or_else(|| unhashable_key("non-integral Float")),
            Value::Str(s) => Ok(MapKey::Str(Arc::clone(s))),
            other => Err(unhashable_key(other.type_name())),
        }
    }

    pub fn str(s: &str) -> MapKey {
        MapKey::Str(Arc::from(s))
    }

    pub fn to_value(&self) -> Value {
        match self {
            MapKey::Bool(b) => Value::Bool(*b),
            MapKey::Int(n) => Value::Int(*n),
            MapKey::Str(s) => Value::Str(Arc::clone(s)),
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "fract() == 0 and magnitude checked"
)]
fn integral(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f.abs() < 9.0e15).then(|| f as i64)
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::str(s)
    }
}

impl From<i64> for MapKey {
    fn from(n: i64) -> Self {
        MapKey::Int(n)
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Bool(b) => write!(f, "{b}"),
            MapKey::Int(n) => write!(f, "{n}"),
            MapKey::Str(s) => f.write_str(s),
        }
    }
}
