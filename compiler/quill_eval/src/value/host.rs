//! Host-side value representation and conversions.
//!
//! Host functions and methods never see script internals: arguments are
//! converted with [`Value::to_host_value`] and results come back through
//! [`Value::from_host`]. Script lists and maps cross as shared handles, so a
//! host method that stores or mutates one keeps the script's aliasing.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{MapKey, SharedList, SharedMap, Value};
use crate::host::{HostObject, HostType};

/// Value as seen by host code.
#[derive(Clone, Debug)]
pub enum HostValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Tuples and host-built sequences. Becomes a fresh list.
    Seq(Vec<HostValue>),
    /// Host-built map. Becomes a fresh map.
    Map(BTreeMap<MapKey, HostValue>),
    /// A script list, shared with the script.
    ListRef(SharedList),
    /// A script map, shared with the script.
    MapRef(SharedMap),
    /// Host class handle.
    Class(HostType),
    Object(Arc<dyn HostObject>),
    /// Script values with no host counterpart (functions, modules,
    /// associations), passed through untouched.
    Opaque(Value),
}

impl HostValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            HostValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, HostValue::Null)
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::Str(s.to_string())
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::Str(s)
    }
}

impl From<i64> for HostValue {
    fn from(n: i64) -> Self {
        HostValue::Int(n)
    }
}

impl From<bool> for HostValue {
    fn from(b: bool) -> Self {
        HostValue::Bool(b)
    }
}

impl Value {
    /// Convert for a host call: tuples become sequences, lists and maps
    /// become shared handles, type wrappers become class handles.
    pub fn to_host_value(&self) -> HostValue {
        match self {
            Value::Null => HostValue::Null,
            Value::Bool(b) => HostValue::Bool(*b),
            Value::Int(n) => HostValue::Int(*n),
            Value::Float(x) => HostValue::Float(*x),
            Value::Str(s) => HostValue::Str(s.to_string()),
            Value::List(items) => HostValue::ListRef(Arc::clone(items)),
            Value::Tuple(items) => HostValue::Seq(items.iter().map(Value::to_host_value).collect()),
            Value::Map(map) => HostValue::MapRef(Arc::clone(map)),
            Value::Type(ty) => HostValue::Class(ty.clone()),
            Value::Object(obj) => HostValue::Object(Arc::clone(obj)),
            Value::Assoc(_) | Value::Function(_) | Value::Module(_) => {
                HostValue::Opaque(self.clone())
            }
        }
    }

    /// Convert a host result back into a script value.
    pub fn from_host(value: HostValue) -> Value {
        match value {
            HostValue::Null => Value::Null,
            HostValue::Bool(b) => Value::Bool(b),
            HostValue::Int(n) => Value::Int(n),
            HostValue::Float(x) => Value::Float(x),
            HostValue::Str(s) => Value::from(s),
            HostValue::Seq(items) => Value::list(items.into_iter().map(Value::from_host).collect()),
            HostValue::Map(entries) => {
                Value::map_from(entries.into_iter().map(|(k, v)| (k, Value::from_host(v))))
            }
            HostValue::ListRef(items) => Value::List(items),
            HostValue::MapRef(map) => Value::Map(map),
            HostValue::Class(ty) => Value::Type(ty),
            HostValue::Object(obj) => Value::Object(obj),
            HostValue::Opaque(value) => value,
        }
    }
}
