//! Module declarations: `module "name" body`.

use quill_ir::ExprId;
use tracing::debug;

use crate::completion::{flow, Completion, FlowResult};
use crate::context::EvalContext;
use crate::errors::{control_outside_loop, type_mismatch};
use crate::scope::{CombinedScope, ModuleClaim, SharedScope};
use crate::Value;

impl EvalContext<'_> {
    /// Find or create the module, running its body only on creation.
    ///
    /// The body runs in `Combined(module scope, current scope)`, so its
    /// declarations land in the module. A `return` ends the body early. If
    /// the body fails the module stays registered and in progress; declaring
    /// it again raises a circular-dependency error.
    pub(super) fn exec_module(&mut self, name: ExprId, body: ExprId) -> FlowResult {
        let name_value = flow!(self.exec(name));
        let Value::Str(name) = &name_value else {
            return Err(type_mismatch("String", name_value.type_name()));
        };

        let handle = match self.globals.claim_module(name, self.execution())? {
            ModuleClaim::Ready(handle) => {
                debug!(module = &**name, "module already initialized");
                return Ok(Completion::Completed(Value::Module(handle)));
            }
            ModuleClaim::Claimed(handle) => handle,
        };

        let scope = SharedScope::new(CombinedScope::new(handle.scope(), self.scope.clone()));
        match self.with_scope(scope, |ctx| ctx.exec(body))? {
            Completion::Completed(_) | Completion::Returned(_) => {}
            Completion::Broke => return Err(control_outside_loop("break")),
            Completion::Continued => return Err(control_outside_loop("continue")),
        }

        handle.resolve()?.mark_initialized();
        debug!(module = &**name, id = ?handle.id(), "module initialized");
        Ok(Completion::Completed(Value::Module(handle)))
    }
}
