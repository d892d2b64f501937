//! Per-execution evaluation state.
//!
//! An [`EvalContext`] owns everything one evaluation needs: the current
//! scope and arena (swapped by [`ScopedContext`] guards and restored on every
//! exit path), the call stack used for error attribution, the host registry,
//! the global scope, the output sink, and the interrupt handle.

mod builder;
mod scope_guard;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use quill_ir::{ExprId, Program, SharedArena};

pub use builder::EvalContextBuilder;

use crate::completion::Completion;
use crate::diagnostics::CallStack;
use crate::errors::{control_outside_loop, EvalError, EvalResult};
use crate::host::HostRegistry;
use crate::interrupt::InterruptHandle;
use crate::output::Output;
use crate::scope::{GlobalScope, SharedScope};
use crate::shared::SharedRegistry;
use crate::Value;

/// Identifies one execution, for module in-progress markers and tracing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExecutionId(u64);

impl ExecutionId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ExecutionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Evaluation limits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Maximum script call depth. `None` relies on `stacker` growing the
    /// native stack.
    pub max_depth: Option<usize>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_depth: if cfg!(target_arch = "wasm32") {
                Some(200)
            } else {
                None
            },
        }
    }
}

/// State of one execution.
pub struct EvalContext<'o> {
    pub(crate) scope: SharedScope,
    pub(crate) arena: SharedArena,
    root: ExprId,
    pub(crate) call_stack: CallStack,
    pub(crate) registry: SharedRegistry<HostRegistry>,
    pub(crate) globals: Arc<GlobalScope>,
    pub(crate) output: Output<'o>,
    pub(crate) interrupt: InterruptHandle,
    config: EvalConfig,
    execution: ExecutionId,
}

impl<'o> EvalContext<'o> {
    pub fn builder(program: &Program) -> EvalContextBuilder<'o> {
        EvalContextBuilder::new(program)
    }

    /// Current scope.
    pub fn scope(&self) -> &SharedScope {
        &self.scope
    }

    pub fn arena(&self) -> &SharedArena {
        &self.arena
    }

    pub fn globals(&self) -> &Arc<GlobalScope> {
        &self.globals
    }

    pub fn registry(&self) -> &SharedRegistry<HostRegistry> {
        &self.registry
    }

    pub fn interrupt_handle(&self) -> &InterruptHandle {
        &self.interrupt
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    pub fn execution(&self) -> ExecutionId {
        self.execution
    }

    pub fn output(&self) -> &Output<'o> {
        &self.output
    }

    /// Consume the context, handing back the sink (to read a `Buffer`).
    pub fn into_output(self) -> Output<'o> {
        self.output
    }

    /// Evaluate the program's root node.
    ///
    /// A top-level `return` ends the program with its value; a stray
    /// `break`/`continue` is an error.
    #[tracing::instrument(level = "debug", skip_all, fields(execution = self.execution.0))]
    pub fn run(&mut self) -> EvalResult {
        let root = self.root;
        let value = self.eval(root)?;
        self.output.flush()?;
        Ok(value)
    }

    /// Evaluate `id` in the current scope and arena, resolving signals.
    pub fn eval(&mut self, id: ExprId) -> EvalResult {
        match self.exec(id)? {
            Completion::Completed(value) | Completion::Returned(value) => Ok(value),
            Completion::Broke => Err(self.annotate(control_outside_loop("break"), id)),
            Completion::Continued => Err(self.annotate(control_outside_loop("continue"), id)),
        }
    }

    /// Call a script or host function from the host.
    pub fn call(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult {
        self.call_value(callee, args, None)
            .map_err(|err| self.snapshot(err, None))
    }

    /// Attach a stack snapshot naming `id` as the origin, unless the error
    /// already carries one.
    pub(crate) fn annotate(&self, err: EvalError, id: ExprId) -> EvalError {
        if err.stack.is_some() {
            return err;
        }
        let origin = self.arena.display(id);
        self.snapshot(err, Some(origin))
    }

    /// Attach a snapshot of the current stack unless one is present.
    pub(crate) fn snapshot(&self, err: EvalError, origin: Option<String>) -> EvalError {
        if err.stack.is_some() {
            return err;
        }
        let stack = self.call_stack.capture(origin);
        err.with_stack(stack)
    }
}
