//! Quill Eval - tree-walking evaluator for Quill expression trees
//!
//! This crate evaluates programs built with `quill_ir`:
//! - `Value` and the reference model (`Ref`) for assignable slots
//! - Scope chain (`Scope`, `SharedScope` and the scope kinds)
//! - Modules registered once in a `GlobalScope`
//! - Closures, host functions and registry-based host method dispatch
//! - `Completion` signals for `return`/`break`/`continue`
//! - `EvalError` with stack snapshots for attribution
//!
//! # Entry points
//!
//! [`evaluate`] and [`evaluate_streaming`] cover the common cases;
//! [`EvalContext::builder`] configures the registry, global scope, interrupt
//! handle, depth limit and output sink.

mod api;
mod completion;
mod context;
mod diagnostics;
pub mod errors;
mod eval;
mod function;
mod host;
mod interrupt;
mod module;
mod output;
mod reference;
pub mod scope;
mod shared;
mod stack;
mod value;

pub use api::{evaluate, evaluate_streaming, Bindings};
pub use completion::{Completion, FlowResult};
pub use context::{EvalConfig, EvalContext, EvalContextBuilder, ExecutionId};
pub use diagnostics::{CallFrame, CallSite, CallStack, SnapshotFrame, StackSnapshot};
pub use errors::{ErrorCategory, EvalError, EvalErrorKind, EvalResult, ScopeError};
pub use function::{BoundMethod, Closure, FunctionValue, HostFn, HostFunction, Receiver};
pub use host::{HostMethod, HostObject, HostRegistry, HostType, MethodKey, ParamKind, Signature};
pub use interrupt::InterruptHandle;
pub use module::{Module, ModuleId, ModuleState, ModuleValue};
pub use output::Output;
pub use reference::{MAX_LIST_PADDING, Ref, Variable};
pub use scope::{
    CombinedScope, GlobalScope, IsolatedScope, MapScope, ObjectScope, Scope, SharedScope,
};
pub use shared::SharedRegistry;
pub use stack::ensure_sufficient_stack;
pub use value::{Association, HostValue, MapKey, SharedList, SharedMap, Value};

#[cfg(test)]
mod tests;
