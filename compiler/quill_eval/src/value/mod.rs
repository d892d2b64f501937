//! Runtime values.
//!
//! Lists and maps are shared and mutable (`Arc<RwLock<..>>`): assigning a list
//! to a second variable aliases it. Everything else is immutable. Refs never
//! appear inside a `Value`; evaluation resolves them before a value escapes.

mod host;
mod key;

use std::fmt::{self, Write};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

pub use host::HostValue;
pub use key::MapKey;

use crate::function::FunctionValue;
use crate::host::{HostObject, HostType};
use crate::module::ModuleValue;

/// Shared, mutable list storage.
pub type SharedList = Arc<RwLock<Vec<Value>>>;

/// Shared, mutable map storage.
pub type SharedMap = Arc<RwLock<FxHashMap<MapKey, Value>>>;

/// A `label -> value` pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Association {
    pub label: Value,
    pub value: Value,
}

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    List(SharedList),
    Map(SharedMap),
    /// Result of a comma sequence. Collapses into a list or map inside `[..]`.
    Tuple(Arc<[Value]>),
    Assoc(Arc<Association>),
    Function(FunctionValue),
    Module(ModuleValue),
    /// Handle to a host class, target of static member access.
    Type(HostType),
    Object(Arc<dyn HostObject>),
}

impl Value {
    pub fn string(s: impl Into<Arc<str>>) -> Value {
        Value::Str(s.into())
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Arc::new(RwLock::new(items)))
    }

    pub fn map(entries: FxHashMap<MapKey, Value>) -> Value {
        Value::Map(Arc::new(RwLock::new(entries)))
    }

    /// Map from `(key, value)` pairs; later duplicates win.
    pub fn map_from(entries: impl IntoIterator<Item = (MapKey, Value)>) -> Value {
        Value::map(entries.into_iter().collect())
    }

    pub fn tuple(items: Vec<Value>) -> Value {
        Value::Tuple(Arc::from(items))
    }

    pub fn assoc(label: Value, value: Value) -> Value {
        Value::Assoc(Arc::new(Association { label, value }))
    }

    pub fn object(object: impl HostObject + 'static) -> Value {
        Value::Object(Arc::new(object))
    }

    /// Everything except `null` and `false` is truthy.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Type name used in error messages and host method lookup.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Boolean",
            Value::Int(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Str(_) => "String",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Tuple(_) => "Tuple",
            Value::Assoc(_) => "Association",
            Value::Function(_) => "Function",
            Value::Module(_) => "Module",
            Value::Type(_) => "Class",
            Value::Object(obj) => obj.type_name(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Snapshot of the list contents.
    pub fn list_items(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items.read().clone()),
            _ => None,
        }
    }

    /// Map entries sorted by key.
    pub fn map_entries(&self) -> Option<Vec<(MapKey, Value)>> {
        match self {
            Value::Map(map) => Some(sorted_entries(map)),
            _ => None,
        }
    }

    /// Write the display form used by `${..}` and string concatenation.
    pub fn write_display(&self, out: &mut impl Write) -> fmt::Result {
        match self {
            Value::Str(s) => out.write_str(s),
            other => other.write_nested(out, &mut Vec::new()),
        }
    }

    /// Display form inside a collection: strings are quoted. `open` holds the
    /// lists and maps being written; meeting one again prints a placeholder.
    fn write_nested(&self, out: &mut impl Write, open: &mut Vec<*const ()>) -> fmt::Result {
        match self {
            Value::Null => out.write_str("null"),
            Value::Bool(b) => write!(out, "{b}"),
            Value::Int(n) => write!(out, "{n}"),
            Value::Float(x) => write!(out, "{x:?}"),
            Value::Str(s) => write!(out, "{s:?}"),
            Value::List(items) => {
                let ptr = Arc::as_ptr(items).cast::<()>();
                if open.contains(&ptr) {
                    return out.write_str("(this List)");
                }
                open.push(ptr);
                out.write_char('[')?;
                for (i, item) in items.read_recursive().iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    item.write_nested(out, open)?;
                }
                open.pop();
                out.write_char(']')
            }
            Value::Map(map) => {
                let ptr = Arc::as_ptr(map).cast::<()>();
                if open.contains(&ptr) {
                    return out.write_str("(this Map)");
                }
                let entries = sorted_entries(map);
                if entries.is_empty() {
                    return out.write_str("[:]");
                }
                open.push(ptr);
                out.write_char('[')?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    write!(out, "{key}: ")?;
                    value.write_nested(out, open)?;
                }
                open.pop();
                out.write_char(']')
            }
            Value::Tuple(items) => {
                out.write_char('(')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    item.write_nested(out, open)?;
                }
                out.write_char(')')
            }
            Value::Assoc(pair) => {
                pair.label.write_nested(out, open)?;
                out.write_str(" -> ")?;
                pair.value.write_nested(out, open)
            }
            Value::Function(func) => write!(out, "<function {}>", func.display_name()),
            Value::Module(module) => write!(out, "<module {}>", module.name()),
            Value::Type(ty) => out.write_str(ty.name()),
            Value::Object(obj) => write!(out, "<{}>", obj.type_name()),
        }
    }

    /// Structural equality. `open` holds the list and map pairs under
    /// comparison; a pair met again is assumed equal.
    #[allow(
        clippy::float_cmp,
        clippy::cast_precision_loss,
        reason = "script equality is exact, ints promote to float"
    )]
    fn eq_nested(&self, other: &Value, open: &mut Vec<(*const (), *const ())>) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                let pair = (Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>());
                if Arc::ptr_eq(a, b) || open.contains(&pair) {
                    return true;
                }
                open.push(pair);
                let (a, b) = (a.read_recursive(), b.read_recursive());
                let equal =
                    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.eq_nested(y, open));
                open.pop();
                equal
            }
            (Value::Map(a), Value::Map(b)) => {
                let pair = (Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>());
                if Arc::ptr_eq(a, b) || open.contains(&pair) {
                    return true;
                }
                open.push(pair);
                let (a, b) = (a.read_recursive(), b.read_recursive());
                let equal = a.len() == b.len()
                    && a
                        .iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| x.eq_nested(y, open)));
                open.pop();
                equal
            }
            (Value::Tuple(a), Value::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.eq_nested(y, open))
            }
            (Value::Assoc(a), Value::Assoc(b)) => {
                a.label.eq_nested(&b.label, open) && a.value.eq_nested(&b.value, open)
            }
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Module(a), Value::Module(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

fn sorted_entries(map: &SharedMap) -> Vec<(MapKey, Value)> {
    let mut entries: Vec<_> = map
        .read()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

/// `Integer(1)`, `List([1, "a"])`. Self-containing collections print a
/// placeholder instead of recursing.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("Null");
        }
        write!(f, "{}(", self.type_name())?;
        self.write_nested(f, &mut Vec::new())?;
        f.write_char(')')
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_display(f)
    }
}

/// Structural equality. Lists and maps compare by contents, functions and
/// host objects by identity. `1 == 1.0`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.eq_nested(other, &mut Vec::new())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<FunctionValue> for Value {
    fn from(func: FunctionValue) -> Self {
        Value::Function(func)
    }
}
