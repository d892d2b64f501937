//! Host method dispatch.
//!
//! Scripts call into the host through an explicit registry instead of
//! reflection: every method is registered under a [`MethodKey`] (type name,
//! method name) together with a [`Signature`]. A call converts its arguments
//! with `to_host_value` and invokes the first candidate whose signature
//! accepts them, in registration order.

mod builtins;
mod object;

use std::fmt;
use std::sync::Arc;

use quill_ir::Symbol;
use rustc_hash::FxHashMap;

pub use object::{HostObject, HostType};

use crate::errors::EvalResult;
use crate::value::HostValue;
use crate::Value;

/// Key for looking up methods in the registry.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodKey {
    /// The type name (e.g., "String", "List", a host object's type name)
    pub type_name: Symbol,
    /// The method name (e.g., "size", "join")
    pub method_name: Symbol,
}

impl MethodKey {
    #[inline]
    pub fn new(type_name: Symbol, method_name: Symbol) -> Self {
        MethodKey {
            type_name,
            method_name,
        }
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.method_name)
    }
}

/// Kind of value a host parameter accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Any,
    Bool,
    Int,
    Float,
    /// `Int` or `Float`.
    Number,
    Str,
    Seq,
    Map,
    Class,
    Object,
    Function,
}

impl ParamKind {
    /// Whether `value` can be passed for this parameter. `null` is accepted
    /// wherever a reference (string, collection, object) is expected.
    pub fn accepts(self, value: &HostValue) -> bool {
        match (self, value) {
            (ParamKind::Any, _)
            | (ParamKind::Bool, HostValue::Bool(_))
            | (ParamKind::Int | ParamKind::Number, HostValue::Int(_))
            | (ParamKind::Float | ParamKind::Number, HostValue::Float(_))
            | (ParamKind::Str, HostValue::Str(_))
            | (ParamKind::Seq, HostValue::Seq(_) | HostValue::ListRef(_))
            | (ParamKind::Map, HostValue::Map(_) | HostValue::MapRef(_))
            | (ParamKind::Class, HostValue::Class(_))
            | (ParamKind::Object, HostValue::Object(_)) => true,
            (ParamKind::Function, HostValue::Opaque(Value::Function(_))) => true,
            (
                ParamKind::Str
                | ParamKind::Seq
                | ParamKind::Map
                | ParamKind::Class
                | ParamKind::Object
                | ParamKind::Function,
                HostValue::Null,
            ) => true,
            _ => false,
        }
    }
}

/// Parameter list of a host method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    params: Vec<ParamKind>,
    /// Kind of trailing variadic arguments, if any.
    variadic: Option<ParamKind>,
}

impl Signature {
    pub fn new(params: impl Into<Vec<ParamKind>>) -> Self {
        Signature {
            params: params.into(),
            variadic: None,
        }
    }

    /// No parameters.
    pub fn empty() -> Self {
        Signature::new(Vec::new())
    }

    pub fn variadic(params: impl Into<Vec<ParamKind>>, rest: ParamKind) -> Self {
        Signature {
            params: params.into(),
            variadic: Some(rest),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn accepts(&self, args: &[HostValue]) -> bool {
        if args.len() < self.params.len() {
            return false;
        }
        let (fixed, rest) = args.split_at(self.params.len());
        let fixed_ok = self.params.iter().zip(fixed).all(|(p, a)| p.accepts(a));
        fixed_ok
            && match self.variadic {
                Some(kind) => rest.iter().all(|a| kind.accepts(a)),
                None => rest.is_empty(),
            }
    }
}

/// Host method implementation. Receives the receiver (the instance, or the
/// `Type` value for static methods) and the converted arguments.
pub type MethodFn = dyn Fn(&Value, &[HostValue]) -> EvalResult<HostValue> + Send + Sync;

/// One overload of a host method.
#[derive(Clone)]
pub struct HostMethod {
    pub signature: Signature,
    func: Arc<MethodFn>,
}

impl HostMethod {
    pub fn call(&self, receiver: &Value, args: &[HostValue]) -> EvalResult<HostValue> {
        (self.func)(receiver, args)
    }
}

impl fmt::Debug for HostMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostMethod")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Registry of host methods and static fields.
#[derive(Default)]
pub struct HostRegistry {
    instance: FxHashMap<MethodKey, Vec<HostMethod>>,
    statics: FxHashMap<MethodKey, Vec<HostMethod>>,
    static_fields: FxHashMap<MethodKey, Value>,
}

impl HostRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the `String`, `List` and `Map` methods.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register(&mut registry);
        registry
    }

    /// Add an instance method overload.
    pub fn register_method(
        &mut self,
        type_name: &str,
        method: &str,
        signature: Signature,
        func: impl Fn(&Value, &[HostValue]) -> EvalResult<HostValue> + Send + Sync + 'static,
    ) -> &mut Self {
        let key = MethodKey::new(Symbol::intern(type_name), Symbol::intern(method));
        self.instance.entry(key).or_default().push(HostMethod {
            signature,
            func: Arc::new(func),
        });
        self
    }

    /// Add a static method overload.
    pub fn register_static(
        &mut self,
        type_name: &str,
        method: &str,
        signature: Signature,
        func: impl Fn(&[HostValue]) -> EvalResult<HostValue> + Send + Sync + 'static,
    ) -> &mut Self {
        let key = MethodKey::new(Symbol::intern(type_name), Symbol::intern(method));
        self.statics.entry(key).or_default().push(HostMethod {
            signature,
            func: Arc::new(move |_: &Value, args: &[HostValue]| func(args)),
        });
        self
    }

    pub fn register_static_field(&mut self, type_name: &str, field: &str, value: Value) -> &mut Self {
        let key = MethodKey::new(Symbol::intern(type_name), Symbol::intern(field));
        self.static_fields.insert(key, value);
        self
    }

    pub fn has_method(&self, type_name: &Symbol, method: &Symbol) -> bool {
        self.instance
            .contains_key(&MethodKey::new(type_name.clone(), method.clone()))
    }

    pub fn has_static(&self, type_name: &Symbol, method: &Symbol) -> bool {
        self.statics
            .contains_key(&MethodKey::new(type_name.clone(), method.clone()))
    }

    pub fn static_field(&self, type_name: &Symbol, field: &Symbol) -> Option<Value> {
        self.static_fields
            .get(&MethodKey::new(type_name.clone(), field.clone()))
            .cloned()
    }

    /// First instance overload accepting `args`.
    pub fn resolve_method(&self, key: &MethodKey, args: &[HostValue]) -> Option<&HostMethod> {
        Self::first_match(self.instance.get(key), args)
    }

    /// First static overload accepting `args`.
    pub fn resolve_static(&self, key: &MethodKey, args: &[HostValue]) -> Option<&HostMethod> {
        Self::first_match(self.statics.get(key), args)
    }

    fn first_match<'r>(
        candidates: Option<&'r Vec<HostMethod>>,
        args: &[HostValue],
    ) -> Option<&'r HostMethod> {
        candidates?.iter().find(|m| m.signature.accepts(args))
    }
}

impl fmt::Debug for HostRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostRegistry")
            .field("instance", &self.instance.len())
            .field("statics", &self.statics.len())
            .field("static_fields", &self.static_fields.len())
            .finish()
    }
}
