//! `EvalContextBuilder` for creating contexts with custom collaborators.

use std::sync::Arc;

use quill_ir::{ExprId, Program, SharedArena};

use super::{EvalConfig, EvalContext, ExecutionId};
use crate::api::Bindings;
use crate::diagnostics::CallStack;
use crate::host::HostRegistry;
use crate::interrupt::InterruptHandle;
use crate::output::Output;
use crate::scope::{CombinedScope, GlobalScope, IsolatedScope, Scope, SharedScope};
use crate::shared::SharedRegistry;

/// Builder for [`EvalContext`].
///
/// Every collaborator has a default: the built-in host registry, the
/// process-wide [`GlobalScope`], a fresh interrupt handle, and a discarding
/// output sink.
pub struct EvalContextBuilder<'o> {
    arena: SharedArena,
    root: ExprId,
    registry: Option<SharedRegistry<HostRegistry>>,
    globals: Option<Arc<GlobalScope>>,
    interrupt: Option<InterruptHandle>,
    scope: Option<SharedScope>,
    bindings: Bindings,
    output: Output<'o>,
    config: EvalConfig,
}

impl<'o> EvalContextBuilder<'o> {
    pub fn new(program: &Program) -> Self {
        EvalContextBuilder {
            arena: program.arena().clone(),
            root: program.root(),
            registry: None,
            globals: None,
            interrupt: None,
            scope: None,
            bindings: Bindings::new(),
            output: Output::Discard,
            config: EvalConfig::default(),
        }
    }

    /// Set the host method registry.
    #[must_use]
    pub fn registry(mut self, registry: SharedRegistry<HostRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Use a private global scope instead of [`GlobalScope::shared`].
    #[must_use]
    pub fn globals(mut self, globals: Arc<GlobalScope>) -> Self {
        self.globals = Some(globals);
        self
    }

    #[must_use]
    pub fn interrupt(mut self, handle: InterruptHandle) -> Self {
        self.interrupt = Some(handle);
        self
    }

    /// Extra host scope consulted after the bindings and before the globals
    /// (a [`MapScope`](crate::scope::MapScope) over a request map, an
    /// [`ObjectScope`](crate::scope::ObjectScope) over a host object, ...).
    #[must_use]
    pub fn scope(mut self, scope: SharedScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Initial named values.
    #[must_use]
    pub fn bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    #[must_use]
    pub fn output(mut self, output: Output<'o>) -> Self {
        self.output = output;
        self
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = Some(max_depth);
        self
    }

    /// Build the context. The root scope is
    /// `Combined(Isolated(bindings), parent)` where `parent` is the global
    /// scope, or `Combined(host scope, global scope)` when a host scope is
    /// set.
    pub fn build(self) -> EvalContext<'o> {
        let globals = self.globals.unwrap_or_else(GlobalScope::shared);
        let global_scope = SharedScope::from(Arc::clone(&globals));
        let parent = match self.scope {
            Some(host) => SharedScope::new(CombinedScope::new(host, global_scope)),
            None => global_scope,
        };

        let local = IsolatedScope::new();
        for (name, value) in self.bindings {
            // Isolated scopes accept every definition.
            let _ = local.def(name, value);
        }

        EvalContext {
            scope: SharedScope::new(CombinedScope::new(SharedScope::new(local), parent)),
            arena: self.arena,
            root: self.root,
            call_stack: CallStack::with_root(self.config.max_depth),
            registry: self.registry.unwrap_or_else(SharedRegistry::builtins),
            globals,
            output: self.output,
            interrupt: self.interrupt.unwrap_or_default(),
            config: self.config,
            execution: ExecutionId::next(),
        }
    }
}
