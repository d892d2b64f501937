//! RAII guards for scope, arena and call-frame changes.
//!
//! A [`ScopedContext`] holds `&mut EvalContext` and implements
//! `Deref`/`DerefMut`, so evaluation continues through the guard exactly as
//! through the context. Dropping the guard (normal return, `?`, or
//! unwinding) restores the previous scope and arena and pops any frame it
//! pushed.
//!
//! ```text
//! let mut scoped = ctx.scoped(loop_scope);
//! scoped.exec(body)?;
//! // previous scope restored here
//! ```

use std::ops::{Deref, DerefMut};

use quill_ir::SharedArena;

use super::EvalContext;
use crate::diagnostics::CallFrame;
use crate::errors::EvalResult;
use crate::scope::SharedScope;

pub(crate) struct ScopedContext<'g, 'o> {
    ctx: &'g mut EvalContext<'o>,
    saved_scope: Option<SharedScope>,
    saved_arena: Option<SharedArena>,
    pushed_frame: bool,
}

impl Drop for ScopedContext<'_, '_> {
    fn drop(&mut self) {
        if let Some(scope) = self.saved_scope.take() {
            self.ctx.scope = scope;
        }
        if let Some(arena) = self.saved_arena.take() {
            self.ctx.arena = arena;
        }
        if self.pushed_frame {
            self.ctx.call_stack.pop();
        }
    }
}

impl<'o> Deref for ScopedContext<'_, 'o> {
    type Target = EvalContext<'o>;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for ScopedContext<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl<'o> EvalContext<'o> {
    /// Swap in `scope` until the guard drops.
    pub(crate) fn scoped(&mut self, scope: SharedScope) -> ScopedContext<'_, 'o> {
        let saved = std::mem::replace(&mut self.scope, scope);
        ScopedContext {
            ctx: self,
            saved_scope: Some(saved),
            saved_arena: None,
            pushed_frame: false,
        }
    }

    /// Run `f` with `scope` as the current scope.
    pub(crate) fn with_scope<T>(
        &mut self,
        scope: SharedScope,
        f: impl FnOnce(&mut EvalContext<'o>) -> T,
    ) -> T {
        let mut scoped = self.scoped(scope);
        f(&mut *scoped)
    }

    /// Push a call frame, and optionally swap in the callee's scope and
    /// arena, until the guard drops. Fails without changing anything when
    /// the depth limit is reached.
    pub(crate) fn enter_call(
        &mut self,
        frame: CallFrame,
        scope: Option<SharedScope>,
        arena: Option<SharedArena>,
    ) -> EvalResult<ScopedContext<'_, 'o>> {
        self.interrupt.check()?;
        self.call_stack.push(frame)?;
        let saved_scope = scope.map(|s| std::mem::replace(&mut self.scope, s));
        let saved_arena = arena.map(|a| std::mem::replace(&mut self.arena, a));
        Ok(ScopedContext {
            ctx: self,
            saved_scope,
            saved_arena,
            pushed_frame: true,
        })
    }
}
