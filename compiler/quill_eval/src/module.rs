//! Modules: named, globally registered, once-initialized scopes.
//!
//! Module scopes are owned by the [`GlobalScope`] registry and addressed by
//! [`ModuleId`]. Script values and the scope adapter used while a module body
//! runs hold a [`ModuleValue`] handle (id plus a weak registry pointer), so a
//! module that stores closures referring to itself does not form an
//! ownership cycle through its own handle.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use quill_ir::Symbol;

use crate::context::ExecutionId;
use crate::errors::{EvalError, EvalResult};
use crate::reference::Ref;
use crate::scope::{GlobalScope, IsolatedScope, Scope, SharedScope};
use crate::Value;

/// Index of a module in its registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleId(u32);

impl ModuleId {
    pub(crate) const fn new(index: u32) -> Self {
        ModuleId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Initialization state of a module.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ModuleState {
    /// The body is running (or failed) under `execution`.
    InProgress { execution: ExecutionId },
    Initialized,
}

/// Name of the boolean binding every module scope carries.
pub const INITIALIZED: &str = "initialized";

/// A registered module.
pub struct Module {
    id: ModuleId,
    name: Arc<str>,
    scope: IsolatedScope,
    state: Mutex<ModuleState>,
}

impl Module {
    pub(crate) fn new(id: ModuleId, name: &str, execution: ExecutionId) -> Self {
        let scope = IsolatedScope::new();
        let flag = Symbol::intern(INITIALIZED);
        scope.bind(flag.clone(), Ref::value(flag, Value::Bool(false)));
        Module {
            id,
            name: Arc::from(name),
            scope,
            state: Mutex::new(ModuleState::InProgress { execution }),
        }
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &IsolatedScope {
        &self.scope
    }

    pub fn state(&self) -> ModuleState {
        *self.state.lock()
    }

    pub fn is_initialized(&self) -> bool {
        self.state() == ModuleState::Initialized
    }

    /// Flip the module to initialized, mirroring the `initialized` binding.
    pub(crate) fn mark_initialized(&self) {
        let mut state = self.state.lock();
        let flag = Symbol::intern(INITIALIZED);
        self.scope
            .bind(flag.clone(), Ref::value(flag, Value::Bool(true)));
        *state = ModuleState::Initialized;
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Script-visible handle to a registered module.
#[derive(Clone)]
pub struct ModuleValue {
    id: ModuleId,
    name: Arc<str>,
    registry: Weak<GlobalScope>,
}

impl ModuleValue {
    pub(crate) fn new(id: ModuleId, name: Arc<str>, registry: Weak<GlobalScope>) -> Self {
        ModuleValue { id, name, registry }
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The registered module behind this handle.
    pub fn resolve(&self) -> EvalResult<Arc<Module>> {
        self.registry
            .upgrade()
            .and_then(|registry| registry.module_by_id(self.id))
            .ok_or_else(|| {
                EvalError::custom(format!("module `{}` is no longer registered", self.name))
            })
    }

    /// Scope view of the module's bindings.
    pub fn scope(&self) -> SharedScope {
        SharedScope::new(ModuleScope(self.clone()))
    }

    pub fn is_initialized(&self) -> bool {
        self.resolve().is_ok_and(|m| m.is_initialized())
    }
}

impl PartialEq for ModuleValue {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Weak::ptr_eq(&self.registry, &other.registry)
    }
}

impl fmt::Debug for ModuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleValue({:?}, {})", self.id, self.name)
    }
}

/// Scope adapter resolving through a module handle.
#[derive(Debug)]
pub struct ModuleScope(ModuleValue);

impl Scope for ModuleScope {
    fn find_ref(&self, name: &Symbol) -> Option<Ref> {
        self.0.resolve().ok()?.scope().find_ref(name)
    }

    fn def(&self, name: Symbol, value: Value) -> EvalResult<Ref> {
        self.0.resolve()?.scope().def(name, value)
    }

    fn val(&self, name: Symbol, value: Value) -> EvalResult<Ref> {
        self.0.resolve()?.scope().val(name, value)
    }
}
