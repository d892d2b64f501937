//! Function calls.
//!
//! Closures run in `Combined(parameters, captured scope)` with their own
//! arena swapped in. Host functions and host methods receive arguments
//! converted with [`Value::to_host_value`]. Every call pushes a frame and
//! checks the interrupt handle.

use std::sync::Arc;

use quill_ir::{ExprId, ExprKind, ExprRange, Param, Symbol};
use tracing::trace;

use crate::completion::{flow, Completion, FlowResult};
use crate::context::EvalContext;
use crate::diagnostics::{CallFrame, CallSite};
use crate::errors::{arity_mismatch, control_outside_loop, missing_method, not_callable, EvalResult};
use crate::function::{BoundMethod, Closure, FunctionValue, HostFunction, Receiver};
use crate::host::MethodKey;
use crate::scope::{CombinedScope, IsolatedScope, Scope, SharedScope};
use crate::value::HostValue;
use crate::Value;

impl EvalContext<'_> {
    /// `callee(args...)`
    pub(super) fn exec_call(&mut self, id: ExprId, callee: ExprId, args: ExprRange) -> FlowResult {
        let callee = flow!(self.exec_callee(callee));
        let args = flow!(self.exec_all(args));
        let site = CallSite {
            arena: self.arena.clone(),
            expr: id,
        };
        self.call_value(&callee, args, Some(site))
            .map(Completion::Completed)
    }

    /// Evaluate a callee expression. Member access goes through
    /// [`member_callee`](Self::member_callee) so methods can be bound.
    fn exec_callee(&mut self, callee: ExprId) -> FlowResult {
        let arena = self.arena.clone();
        match arena.get(callee) {
            ExprKind::Member { target, name } => {
                let target = flow!(self.exec(*target));
                let callee = self
                    .member_callee(&target, name)
                    .map_err(|err| self.annotate(err, callee))?;
                Ok(Completion::Completed(callee))
            }
            _ => self.exec(callee),
        }
    }

    /// Invoke any callable value.
    pub(crate) fn call_value(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        site: Option<CallSite>,
    ) -> EvalResult {
        match callee {
            Value::Function(FunctionValue::Closure(closure)) => {
                self.call_closure(closure, args, site)
            }
            Value::Function(FunctionValue::Host(func)) => self.call_host(func, &args, site),
            Value::Function(FunctionValue::Method(method)) => {
                self.call_method(method, &args, site)
            }
            other => Err(not_callable(other.type_name())),
        }
    }

    fn call_closure(
        &mut self,
        closure: &Arc<Closure>,
        args: Vec<Value>,
        site: Option<CallSite>,
    ) -> EvalResult {
        let params = closure.arena.get_params(closure.params);
        let locals = bind_params(closure.display_name(), params, args)?;
        let scope = SharedScope::new(CombinedScope::new(
            SharedScope::new(locals),
            closure.scope.clone(),
        ));
        trace!(function = closure.display_name(), "calling closure");

        let frame = CallFrame::new(closure.display_name(), site);
        let mut scoped = self.enter_call(frame, Some(scope), Some(closure.arena.clone()))?;
        match scoped.exec(closure.body)? {
            Completion::Completed(value) | Completion::Returned(value) => Ok(value),
            Completion::Broke => Err(scoped.snapshot(control_outside_loop("break"), None)),
            Completion::Continued => Err(scoped.snapshot(control_outside_loop("continue"), None)),
        }
    }

    fn call_host(
        &mut self,
        func: &HostFunction,
        args: &[Value],
        site: Option<CallSite>,
    ) -> EvalResult {
        trace!(function = func.name().as_str(), args = args.len(), "calling host function");
        let frame = CallFrame::new(func.name().as_str(), site);
        let scoped = self.enter_call(frame, None, None)?;
        let args: Vec<HostValue> = args.iter().map(Value::to_host_value).collect();
        func.call(&args)
            .map(Value::from_host)
            .map_err(|err| scoped.snapshot(err, None))
    }

    /// Resolve a bound method against the registry and invoke the first
    /// overload whose signature accepts the converted arguments.
    fn call_method(
        &mut self,
        method: &BoundMethod,
        args: &[Value],
        site: Option<CallSite>,
    ) -> EvalResult {
        let host_args: Vec<HostValue> = args.iter().map(Value::to_host_value).collect();
        let registry = self.registry.clone();
        let (receiver, resolved) = match &method.receiver {
            Receiver::Instance(value) => {
                let key = MethodKey::new(Symbol::intern(value.type_name()), method.name.clone());
                (value.clone(), registry.resolve_method(&key, &host_args))
            }
            Receiver::Static(ty) => {
                let key = MethodKey::new(ty.symbol().clone(), method.name.clone());
                (Value::Type(ty.clone()), registry.resolve_static(&key, &host_args))
            }
        };
        let type_name = match &method.receiver {
            Receiver::Instance(value) => value.type_name().to_string(),
            Receiver::Static(ty) => ty.name().to_string(),
        };
        let Some(resolved) = resolved else {
            trace!(method = method.name.as_str(), %type_name, "no matching overload");
            return Err(missing_method(method.name.as_str(), &type_name, args));
        };

        trace!(method = method.name.as_str(), %type_name, "dispatching host method");
        let frame = CallFrame::new(format!("{type_name}.{}", method.name), site);
        let scoped = self.enter_call(frame, None, None)?;
        resolved
            .call(&receiver, &host_args)
            .map(Value::from_host)
            .map_err(|err| scoped.snapshot(err, None))
    }
}

/// Bind call arguments to closure parameters in a fresh scope.
///
/// - a single tuple argument is unpacked across several parameters
/// - a trailing spread parameter collects the remaining arguments as a list
/// - missing arguments bind `null`
/// - surplus arguments without a spread parameter are an arity error
fn bind_params(name: &str, params: &[Param], mut args: Vec<Value>) -> EvalResult<IsolatedScope> {
    if params.len() > 1 && args.len() == 1 {
        if let Value::Tuple(items) = &args[0] {
            args = items.to_vec();
        }
    }

    let (fixed, spread) = match params.split_last() {
        Some((last, rest)) if last.spread => (rest, Some(last)),
        _ => (params, None),
    };
    if spread.is_none() && args.len() > fixed.len() {
        return Err(arity_mismatch(name, fixed.len(), args.len()));
    }

    let locals = IsolatedScope::new();
    let mut args = args.into_iter();
    for param in fixed {
        locals.def(param.name.clone(), args.next().unwrap_or(Value::Null))?;
    }
    if let Some(param) = spread {
        locals.def(param.name.clone(), Value::list(args.collect()))?;
    }
    Ok(locals)
}
