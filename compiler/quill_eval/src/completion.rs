//! Completion signals for non-local control flow.
//!
//! `return`, `break` and `continue` are ordinary results, not errors: every
//! node evaluates to a [`Completion`] and the nodes that own a signal (calls
//! own `Returned`, loops own `Broke` and `Continued`) resolve it. Nothing
//! here captures a stack.

use crate::errors::EvalError;
use crate::Value;

/// How evaluation of a node finished.
#[derive(Clone, Debug, PartialEq)]
pub enum Completion<T = Value> {
    /// Normal completion with a value.
    Completed(T),
    /// `return`, unwinding to the enclosing call.
    Returned(Value),
    /// `break`, unwinding to the enclosing loop.
    Broke,
    /// `continue`, unwinding to the enclosing loop.
    Continued,
}

/// Result of evaluating a node.
pub type FlowResult<T = Value> = Result<Completion<T>, EvalError>;

impl<T> Completion<T> {
    #[inline]
    pub fn is_completed(&self) -> bool {
        matches!(self, Completion::Completed(_))
    }

    /// Transform the completed value, passing signals through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Completion<U> {
        match self {
            Completion::Completed(v) => Completion::Completed(f(v)),
            Completion::Returned(v) => Completion::Returned(v),
            Completion::Broke => Completion::Broke,
            Completion::Continued => Completion::Continued,
        }
    }
}

/// Unwrap a `FlowResult`, returning early from the enclosing function on an
/// error or on any signal other than `Completed`.
macro_rules! flow {
    ($e:expr) => {
        match $e? {
            $crate::completion::Completion::Completed(value) => value,
            $crate::completion::Completion::Returned(value) => {
                return Ok($crate::completion::Completion::Returned(value))
            }
            $crate::completion::Completion::Broke => {
                return Ok($crate::completion::Completion::Broke)
            }
            $crate::completion::Completion::Continued => {
                return Ok($crate::completion::Completion::Continued)
            }
        }
    };
}

pub(crate) use flow;
