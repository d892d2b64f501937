//! Function values.
//!
//! - `Closure`: script lambda with its captured scope and arena
//! - `Host`: named host callable taking converted arguments
//! - `Method`: receiver plus method name, resolved against the host registry
//!   at call time

use std::fmt;
use std::sync::Arc;

use quill_ir::{ExprId, ParamRange, SharedArena, Symbol};

use crate::errors::EvalResult;
use crate::host::HostType;
use crate::scope::SharedScope;
use crate::value::HostValue;
use crate::Value;

/// Signature of host functions.
pub type HostFn = dyn Fn(&[HostValue]) -> EvalResult<HostValue> + Send + Sync;

/// A script closure.
pub struct Closure {
    /// Name of the `var`/`val` the lambda was declared with, if any.
    pub name: Option<Symbol>,
    pub params: ParamRange,
    pub body: ExprId,
    /// Arena holding `params` and `body`.
    pub arena: SharedArena,
    /// Scope captured at creation.
    pub scope: SharedScope,
}

impl Closure {
    pub fn display_name(&self) -> &str {
        self.name.as_ref().map_or("<closure>", Symbol::as_str)
    }
}

/// A host function bound to a script name.
#[derive(Clone)]
pub struct HostFunction {
    name: Symbol,
    func: Arc<HostFn>,
}

impl HostFunction {
    pub fn new(
        name: &str,
        func: impl Fn(&[HostValue]) -> EvalResult<HostValue> + Send + Sync + 'static,
    ) -> Self {
        HostFunction {
            name: Symbol::intern(name),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &Symbol {
        &self.name
    }

    pub fn call(&self, args: &[HostValue]) -> EvalResult<HostValue> {
        (self.func)(args)
    }
}

/// What a bound method is invoked on.
#[derive(Clone, Debug, PartialEq)]
pub enum Receiver {
    Instance(Value),
    Static(HostType),
}

/// A method name bound to a receiver.
#[derive(Debug)]
pub struct BoundMethod {
    pub receiver: Receiver,
    pub name: Symbol,
}

/// Callable value.
#[derive(Clone)]
pub enum FunctionValue {
    Closure(Arc<Closure>),
    Host(HostFunction),
    Method(Arc<BoundMethod>),
}

impl FunctionValue {
    /// Instance method bound to `receiver`.
    pub fn bound(receiver: Value, name: Symbol) -> Self {
        FunctionValue::Method(Arc::new(BoundMethod {
            receiver: Receiver::Instance(receiver),
            name,
        }))
    }

    /// Static method of a host type.
    pub fn bound_static(ty: HostType, name: Symbol) -> Self {
        FunctionValue::Method(Arc::new(BoundMethod {
            receiver: Receiver::Static(ty),
            name,
        }))
    }

    pub fn display_name(&self) -> String {
        match self {
            FunctionValue::Closure(closure) => closure.display_name().to_string(),
            FunctionValue::Host(func) => func.name.as_str().to_string(),
            FunctionValue::Method(method) => match &method.receiver {
                Receiver::Instance(value) => format!("{}.{}", value.type_name(), method.name),
                Receiver::Static(ty) => format!("{}.{}", ty.name(), method.name),
            },
        }
    }
}

/// Functions compare by identity; bound methods by receiver and name.
impl PartialEq for FunctionValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FunctionValue::Closure(a), FunctionValue::Closure(b)) => Arc::ptr_eq(a, b),
            (FunctionValue::Host(a), FunctionValue::Host(b)) => {
                a.name == b.name && Arc::ptr_eq(&a.func, &b.func)
            }
            (FunctionValue::Method(a), FunctionValue::Method(b)) => {
                a.name == b.name && a.receiver == b.receiver
            }
            _ => false,
        }
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionValue({})", self.display_name())
    }
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostFunction({})", self.name)
    }
}
