//! Evaluation errors.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` carries typed data for every failure so hosts can match on
//! the kind instead of parsing messages. Factory functions (`undefined_property`,
//! `cannot_assign_immutable`, ...) are the public way to build errors; they are
//! `#[cold]` because every one of them sits on a failure path.
//!
//! Errors are classified by [`ErrorCategory`]:
//! - `Thrown`: raised by a script `throw`
//! - `Internal`: raised by the evaluator itself (undefined names, type errors, ...)
//! - `Abort`: host interruption and sink failures, never caught by script `try`

use std::fmt;
use std::io;

use quill_ir::{BinaryOp, Symbol, UnaryOp};

use crate::diagnostics::StackSnapshot;
use crate::Value;

/// Result of evaluating to a plain value.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Failures of scope operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("`{name}` is immutable")]
    Immutable { name: String },

    #[error("circular module dependency: module `{name}` is still being initialized")]
    CyclicModule { name: String },

    #[error("`{operation}` is not supported by {scope} scopes")]
    Unsupported {
        operation: &'static str,
        scope: &'static str,
    },

    #[error("cannot declare module `{name}`: the name is bound to a non-module value")]
    ModuleNameConflict { name: String },
}

/// Typed error category.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalErrorKind {
    /// A script `throw`. The thrown value itself lives on [`EvalError::thrown`].
    #[error("{message}")]
    Thrown { message: String },

    #[error("`{name}` is undefined")]
    UndefinedProperty { name: String },

    #[error(
        "no matching method `{method}` on {type_name} for argument types ({})",
        .arg_types.join(", ")
    )]
    MissingMethod {
        method: String,
        type_name: String,
        arg_types: Vec<String>,
    },

    #[error(transparent)]
    Scope(#[from] ScopeError),

    // Type/Operator
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("operator `{}` cannot be applied to {type_name}", .op.as_symbol())]
    InvalidBinaryOp { type_name: String, op: BinaryOp },

    #[error("operator `{}` cannot be applied to {type_name}", .op.as_symbol())]
    InvalidUnaryOp { type_name: String, op: UnaryOp },

    #[error("operator `{}` cannot be applied to {left} and {right}", .op.as_symbol())]
    BinaryTypeMismatch {
        op: BinaryOp,
        left: String,
        right: String,
    },

    // Arithmetic
    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: String },

    // Access
    #[error("{type_name} does not support indexing")]
    IndexNotSupported { type_name: String },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("cannot extend list of length {len} to index {index} (padding limit: {limit})")]
    ListTooLarge {
        index: usize,
        len: usize,
        limit: usize,
    },

    #[error("{type_name} cannot be used as a map key")]
    UnhashableKey { type_name: String },

    #[error("{type_name} is not iterable")]
    NotIterable { type_name: String },

    #[error("invalid assignment target: {target}")]
    InvalidAssignmentTarget { target: String },

    // Function
    #[error("{type_name} is not callable")]
    NotCallable { type_name: String },

    #[error("{name} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("maximum call depth exceeded (limit: {depth})")]
    StackOverflow { depth: usize },

    #[error("`{keyword}` outside of a loop")]
    ControlOutsideLoop { keyword: &'static str },

    // Abort
    #[error("evaluation interrupted")]
    Interrupted,

    #[error("output error: {message}")]
    Output { message: String },

    #[error("{message}")]
    Custom { message: String },
}

/// How an error participates in script-level `try/catch`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// User-raised with `throw`.
    Thrown,
    /// Raised by the evaluator. Catchable.
    Internal,
    /// Host-side termination. Never catchable.
    Abort,
}

/// Evaluation error.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Copy of the call stack taken at the innermost frame that observed
    /// the error.
    pub stack: Option<StackSnapshot>,
    /// The value passed to `throw`, for `Thrown` errors.
    pub thrown: Option<Value>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            stack: None,
            thrown: None,
        }
    }

    /// Error with a free-form message (`Custom` kind).
    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::Custom {
            message: message.into(),
        })
    }

    /// Error raised by a script `throw`.
    pub fn thrown(value: Value) -> Self {
        EvalError {
            kind: EvalErrorKind::Thrown {
                message: value.to_string(),
            },
            stack: None,
            thrown: Some(value),
        }
    }

    /// Attach a stack snapshot unless one is already present.
    #[must_use]
    pub fn with_stack(mut self, stack: StackSnapshot) -> Self {
        if self.stack.is_none() {
            self.stack = Some(stack);
        }
        self
    }

    pub fn category(&self) -> ErrorCategory {
        match self.kind {
            EvalErrorKind::Thrown { .. } => ErrorCategory::Thrown,
            EvalErrorKind::Interrupted | EvalErrorKind::Output { .. } => ErrorCategory::Abort,
            _ => ErrorCategory::Internal,
        }
    }

    /// Whether a script `try/catch` may handle this error.
    #[inline]
    pub fn is_catchable(&self) -> bool {
        self.category() != ErrorCategory::Abort
    }

    /// Value bound to the `catch` variable: the thrown value, or the message
    /// for evaluator-raised errors.
    pub fn catch_value(&self) -> Value {
        match &self.thrown {
            Some(value) => value.clone(),
            None => Value::string(self.kind.to_string()),
        }
    }

    /// Message plus the stack snapshot, if any.
    pub fn report(&self) -> String {
        match &self.stack {
            Some(stack) if !stack.is_empty() => format!("{}\n{stack}", self.kind),
            _ => self.kind.to_string(),
        }
    }
}

impl From<ScopeError> for EvalError {
    fn from(err: ScopeError) -> Self {
        EvalError::new(EvalErrorKind::Scope(err))
    }
}

// Scope errors

#[cold]
pub fn undefined_property(name: &Symbol) -> EvalError {
    EvalError::new(EvalErrorKind::UndefinedProperty {
        name: name.as_str().to_string(),
    })
}

#[cold]
pub fn cannot_assign_immutable(name: &str) -> EvalError {
    ScopeError::Immutable {
        name: name.to_string(),
    }
    .into()
}

#[cold]
pub fn cyclic_module(name: &str) -> EvalError {
    ScopeError::CyclicModule {
        name: name.to_string(),
    }
    .into()
}

#[cold]
pub fn unsupported_scope_operation(operation: &'static str, scope: &'static str) -> EvalError {
    ScopeError::Unsupported { operation, scope }.into()
}

#[cold]
pub fn module_name_conflict(name: &str) -> EvalError {
    ScopeError::ModuleNameConflict {
        name: name.to_string(),
    }
    .into()
}

// Method dispatch errors

#[cold]
pub fn missing_method(method: &str, type_name: &str, args: &[Value]) -> EvalError {
    EvalError::new(EvalErrorKind::MissingMethod {
        method: method.to_string(),
        type_name: type_name.to_string(),
        arg_types: args.iter().map(|a| a.type_name().to_string()).collect(),
    })
}

#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::new(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn stack_overflow(depth: usize) -> EvalError {
    EvalError::new(EvalErrorKind::StackOverflow { depth })
}

#[cold]
pub fn control_outside_loop(keyword: &'static str) -> EvalError {
    EvalError::new(EvalErrorKind::ControlOutsideLoop { keyword })
}

// Type and operator errors

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::new(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn invalid_binary_op(type_name: &str, op: BinaryOp) -> EvalError {
    EvalError::new(EvalErrorKind::InvalidBinaryOp {
        type_name: type_name.to_string(),
        op,
    })
}

#[cold]
pub fn invalid_unary_op(type_name: &str, op: UnaryOp) -> EvalError {
    EvalError::new(EvalErrorKind::InvalidUnaryOp {
        type_name: type_name.to_string(),
        op,
    })
}

#[cold]
pub fn binary_type_mismatch(op: BinaryOp, left: &str, right: &str) -> EvalError {
    EvalError::new(EvalErrorKind::BinaryTypeMismatch {
        op,
        left: left.to_string(),
        right: right.to_string(),
    })
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::new(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::new(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

// Access errors

#[cold]
pub fn index_not_supported(type_name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::IndexNotSupported {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::new(EvalErrorKind::IndexOutOfBounds { index, len })
}

#[cold]
pub fn list_too_large(index: usize, len: usize, limit: usize) -> EvalError {
    EvalError::new(EvalErrorKind::ListTooLarge { index, len, limit })
}

#[cold]
pub fn unhashable_key(type_name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::UnhashableKey {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn not_iterable(type_name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::NotIterable {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn invalid_assignment_target(target: impl fmt::Display) -> EvalError {
    EvalError::new(EvalErrorKind::InvalidAssignmentTarget {
        target: target.to_string(),
    })
}

// Abort

#[cold]
pub fn interrupted() -> EvalError {
    EvalError::new(EvalErrorKind::Interrupted)
}

#[cold]
pub fn output_error(err: &io::Error) -> EvalError {
    EvalError::new(EvalErrorKind::Output {
        message: err.to_string(),
    })
}
