use std::fmt;
use std::sync::{Arc, LazyLock, Weak};

use parking_lot::{Mutex, RwLock};
use quill_ir::Symbol;
use tracing::debug;

use super::{IsolatedScope, Scope};
use crate::context::ExecutionId;
use crate::errors::{cyclic_module, module_name_conflict, EvalError, EvalResult};
use crate::function::HostFunction;
use crate::module::{Module, ModuleId, ModuleState, ModuleValue};
use crate::reference::Ref;
use crate::{FunctionValue, Value};

static SHARED: LazyLock<Arc<GlobalScope>> = LazyLock::new(GlobalScope::new);

/// Outcome of a module declaration's find-or-create step.
#[derive(Debug)]
pub enum ModuleClaim {
    /// Already initialized; the body must not run again.
    Ready(ModuleValue),
    /// Freshly registered; the caller owns initialization.
    Claimed(ModuleValue),
}

/// Process-wide bindings and module registry.
///
/// [`GlobalScope::shared`] is the instance every execution uses by default;
/// hosts and tests may create private ones with [`GlobalScope::new`].
pub struct GlobalScope {
    bindings: IsolatedScope,
    /// Module arena, indexed by `ModuleId`.
    modules: RwLock<Vec<Arc<Module>>>,
    /// Serializes find-or-create of modules.
    registration: Mutex<()>,
    this: Weak<GlobalScope>,
}

impl GlobalScope {
    pub fn new() -> Arc<GlobalScope> {
        Arc::new_cyclic(|this| GlobalScope {
            bindings: IsolatedScope::new(),
            modules: RwLock::new(Vec::new()),
            registration: Mutex::new(()),
            this: this.clone(),
        })
    }

    /// The process-wide instance.
    pub fn shared() -> Arc<GlobalScope> {
        Arc::clone(&SHARED)
    }

    /// Bind a host function under its own name (immutable).
    pub fn register_function(&self, func: HostFunction) {
        let name = func.name().clone();
        self.bindings.bind(
            name.clone(),
            Ref::value(name, Value::Function(FunctionValue::Host(func))),
        );
    }

    /// Registered module by name.
    pub fn module(&self, name: &str) -> Option<ModuleValue> {
        match self.bindings.find_ref(&Symbol::intern(name))?.get() {
            Ok(Value::Module(module)) => Some(module),
            _ => None,
        }
    }

    pub fn module_by_id(&self, id: ModuleId) -> Option<Arc<Module>> {
        self.modules.read().get(id.index()).cloned()
    }

    pub fn module_count(&self) -> usize {
        self.modules.read().len()
    }

    /// Find or create the module `name` as one atomic step.
    ///
    /// A module still in progress (re-entered by its own body, or being
    /// initialized by another execution) is a circular dependency.
    pub(crate) fn claim_module(&self, name: &str, execution: ExecutionId) -> EvalResult<ModuleClaim> {
        let _registration = self.registration.lock();
        let symbol = Symbol::intern(name);

        if let Some(existing) = self.bindings.find_ref(&symbol) {
            let Value::Module(handle) = existing.get()? else {
                return Err(module_name_conflict(name));
            };
            return match handle.resolve()?.state() {
                ModuleState::Initialized => Ok(ModuleClaim::Ready(handle)),
                ModuleState::InProgress { execution: owner } => {
                    debug!(module = name, ?owner, ?execution, "module re-entered during initialization");
                    Err(cyclic_module(name))
                }
            };
        }

        let mut modules = self.modules.write();
        let index = u32::try_from(modules.len())
            .map_err(|_| EvalError::custom("module registry is full"))?;
        let id = ModuleId::new(index);
        let module = Arc::new(Module::new(id, name, execution));
        let handle = ModuleValue::new(id, Arc::from(name), self.this.clone());
        modules.push(module);
        self.bindings
            .bind(symbol.clone(), Ref::value(symbol, Value::Module(handle.clone())));
        debug!(module = name, ?id, ?execution, "registered module");
        Ok(ModuleClaim::Claimed(handle))
    }
}

impl Scope for GlobalScope {
    fn find_ref(&self, name: &Symbol) -> Option<Ref> {
        self.bindings.find_ref(name)
    }

    fn def(&self, name: Symbol, value: Value) -> EvalResult<Ref> {
        self.bindings.def(name, value)
    }

    fn val(&self, name: Symbol, value: Value) -> EvalResult<Ref> {
        self.bindings.val(name, value)
    }
}

impl fmt::Debug for GlobalScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalScope")
            .field("bindings", &self.bindings)
            .field("modules", &self.module_count())
            .finish()
    }
}
