//! Scope chain: environments that resolve symbols to [`Ref`]s.
//!
//! # Architecture
//!
//! - `IsolatedScope`: private symbol table
//! - `CombinedScope`: local-then-parent lookup; definitions land in local
//! - `MapScope`: adapts a shared script map
//! - `ObjectScope`: adapts a host object's properties and methods
//! - `GlobalScope`: process-wide bindings plus the module registry
//!
//! All scopes sit behind [`SharedScope`] handles. A closure's captured scope
//! is the same handle for every closure created at that point, so writes
//! through one are visible to all.

mod combined;
mod global;
mod isolated;
mod map;
mod object;

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use quill_ir::Symbol;

pub use combined::CombinedScope;
pub use global::{GlobalScope, ModuleClaim};
pub use isolated::IsolatedScope;
pub use map::MapScope;
pub use object::ObjectScope;

use crate::errors::{undefined_property, EvalResult};
use crate::reference::Ref;
use crate::Value;

/// An environment mapping symbols to refs.
pub trait Scope: Send + Sync + fmt::Debug {
    /// Look a name up without creating anything.
    fn find_ref(&self, name: &Symbol) -> Option<Ref>;

    /// Define a mutable binding.
    fn def(&self, name: Symbol, value: Value) -> EvalResult<Ref>;

    /// Define an immutable binding.
    fn val(&self, name: Symbol, value: Value) -> EvalResult<Ref>;

    fn get(&self, name: &Symbol) -> EvalResult {
        match self.find_ref(name) {
            Some(r) => r.get(),
            None => Err(undefined_property(name)),
        }
    }

    /// Write through an existing binding, or define a mutable one.
    fn set(&self, name: &Symbol, value: Value) -> EvalResult<()> {
        match self.find_ref(name) {
            Some(r) if !r.is_undefined() => r.set(value),
            _ => self.def(name.clone(), value).map(drop),
        }
    }

    fn set_all(&self, bindings: &[(Symbol, Value)]) -> EvalResult<()> {
        for (name, value) in bindings {
            self.set(name, value.clone())?;
        }
        Ok(())
    }
}

/// Shared handle to a scope.
#[derive(Clone)]
pub struct SharedScope(Arc<dyn Scope>);

impl SharedScope {
    pub fn new(scope: impl Scope + 'static) -> Self {
        SharedScope(Arc::new(scope))
    }

    /// Whether both handles point at the same scope.
    pub fn ptr_eq(&self, other: &SharedScope) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    /// Resolve `name`, yielding an `Undefined` ref owned by this scope when it
    /// is unbound.
    pub fn lookup(&self, name: &Symbol) -> Ref {
        self.0.find_ref(name).unwrap_or_else(|| Ref::Undefined {
            name: name.clone(),
            owner: self.clone(),
        })
    }
}

impl<S: Scope + 'static> From<Arc<S>> for SharedScope {
    fn from(scope: Arc<S>) -> Self {
        SharedScope(scope)
    }
}

impl Deref for SharedScope {
    type Target = dyn Scope;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Debug for SharedScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

#[cfg(test)]
mod tests;
