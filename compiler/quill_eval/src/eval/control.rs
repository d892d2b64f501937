//! Loops, `try/catch` and assignment.

use quill_ir::{ExprId, ExprKind, Symbol};

use super::collections::iteration_items;
use crate::completion::{flow, Completion, FlowResult};
use crate::context::EvalContext;
use crate::errors::invalid_assignment_target;
use crate::reference::Ref;
use crate::scope::{CombinedScope, IsolatedScope, Scope, SharedScope};
use crate::Value;

/// What a loop does after one run of its body.
enum LoopStep {
    Next,
    Exit,
    Return(Value),
}

fn loop_step(completion: Completion) -> LoopStep {
    match completion {
        Completion::Completed(_) | Completion::Continued => LoopStep::Next,
        Completion::Broke => LoopStep::Exit,
        Completion::Returned(value) => LoopStep::Return(value),
    }
}

impl EvalContext<'_> {
    /// `while (cond) body`. Yields `null`.
    pub(super) fn exec_while(&mut self, cond: ExprId, body: ExprId) -> FlowResult {
        loop {
            self.interrupt.check()?;
            if !flow!(self.exec(cond)).is_truthy() {
                break;
            }
            match loop_step(self.exec(body)?) {
                LoopStep::Next => {}
                LoopStep::Exit => break,
                LoopStep::Return(value) => return Ok(Completion::Returned(value)),
            }
        }
        Ok(Completion::Completed(Value::Null))
    }

    /// `for (binding in iter) body`. Each iteration binds `binding` in a
    /// fresh scope over the current one. Yields `null`.
    pub(super) fn exec_for(&mut self, binding: &Symbol, iter: ExprId, body: ExprId) -> FlowResult {
        let iterable = flow!(self.exec(iter));
        for item in iteration_items(&iterable)? {
            self.interrupt.check()?;
            let locals = IsolatedScope::new();
            locals.def(binding.clone(), item)?;
            let scope = SharedScope::new(CombinedScope::new(
                SharedScope::new(locals),
                self.scope.clone(),
            ));
            let completion = self.with_scope(scope, |ctx| ctx.exec(body))?;
            match loop_step(completion) {
                LoopStep::Next => {}
                LoopStep::Exit => break,
                LoopStep::Return(value) => return Ok(Completion::Returned(value)),
            }
        }
        Ok(Completion::Completed(Value::Null))
    }

    /// `try body catch (binding) handler`.
    ///
    /// Thrown and evaluator errors are caught; aborts (interrupts, sink
    /// failures) always propagate. The handler sees `binding` as an
    /// immutable value in a fresh scope.
    pub(super) fn exec_try(&mut self, body: ExprId, binding: &Symbol, handler: ExprId) -> FlowResult {
        match self.exec(body) {
            Err(err) if err.is_catchable() => {
                tracing::trace!(error = %err, "caught error");
                let locals = IsolatedScope::new();
                locals.val(binding.clone(), err.catch_value())?;
                let scope = SharedScope::new(CombinedScope::new(
                    SharedScope::new(locals),
                    self.scope.clone(),
                ));
                self.with_scope(scope, |ctx| ctx.exec(handler))
            }
            other => other,
        }
    }

    /// Store `value` into an assignment target: identifier, index, member,
    /// or a tuple of targets (positional destructuring, missing elements
    /// become `null`).
    pub(super) fn assign(&mut self, target: ExprId, value: Value) -> FlowResult<()> {
        let arena = self.arena.clone();
        if let ExprKind::Tuple(targets) = arena.get(target) {
            let items = match &value {
                Value::Tuple(items) => items.to_vec(),
                Value::List(items) => items.read().clone(),
                single => vec![single.clone()],
            };
            let mut items = items.into_iter();
            for &target in arena.get_list(*targets) {
                flow!(self.assign(target, items.next().unwrap_or(Value::Null)));
            }
            return Ok(Completion::Completed(()));
        }
        let slot = flow!(self.exec_ref(target));
        slot.set(value).map_err(|err| self.annotate(err, target))?;
        Ok(Completion::Completed(()))
    }

    /// Evaluate an expression for assignment, yielding a slot.
    pub(crate) fn exec_ref(&mut self, target: ExprId) -> FlowResult<Ref> {
        let arena = self.arena.clone();
        let slot = match arena.get(target) {
            ExprKind::Ident(name) => self.scope.lookup(name),
            ExprKind::Index { target, key } => flow!(self.exec_index_ref(*target, *key)),
            ExprKind::Member { target, name } => {
                let target = flow!(self.exec(*target));
                self.member_ref(&target, name)?
            }
            _ => return Err(invalid_assignment_target(arena.display(target))),
        };
        Ok(Completion::Completed(slot))
    }
}
