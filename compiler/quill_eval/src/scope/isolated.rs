use std::fmt;

use parking_lot::RwLock;
use quill_ir::Symbol;
use rustc_hash::FxHashMap;

use super::Scope;
use crate::errors::EvalResult;
use crate::reference::Ref;
use crate::Value;

/// A private symbol table. Redefining a name replaces its binding.
#[derive(Default)]
pub struct IsolatedScope {
    bindings: RwLock<FxHashMap<Symbol, Ref>>,
}

impl IsolatedScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    pub fn contains(&self, name: &Symbol) -> bool {
        self.bindings.read().contains_key(name)
    }

    pub(crate) fn bind(&self, name: Symbol, binding: Ref) -> Ref {
        self.bindings.write().insert(name, binding.clone());
        binding
    }
}

impl Scope for IsolatedScope {
    fn find_ref(&self, name: &Symbol) -> Option<Ref> {
        self.bindings.read().get(name).cloned()
    }

    fn def(&self, name: Symbol, value: Value) -> EvalResult<Ref> {
        Ok(self.bind(name.clone(), Ref::variable(name, value)))
    }

    fn val(&self, name: Symbol, value: Value) -> EvalResult<Ref> {
        Ok(self.bind(name.clone(), Ref::value(name, value)))
    }
}

impl fmt::Debug for IsolatedScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = self.bindings.read();
        let mut names: Vec<&str> = bindings.keys().map(Symbol::as_str).collect();
        names.sort_unstable();
        f.debug_struct("IsolatedScope")
            .field("names", &names)
            .finish()
    }
}
