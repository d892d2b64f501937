use quill_ir::Symbol;

use super::{Scope, SharedScope};
use crate::errors::EvalResult;
use crate::reference::Ref;
use crate::Value;

/// Two scopes layered: lookups try `local` first, definitions go to `local`.
#[derive(Clone, Debug)]
pub struct CombinedScope {
    local: SharedScope,
    parent: SharedScope,
}

impl CombinedScope {
    pub fn new(local: SharedScope, parent: SharedScope) -> Self {
        CombinedScope { local, parent }
    }

    pub fn local(&self) -> &SharedScope {
        &self.local
    }

    pub fn parent(&self) -> &SharedScope {
        &self.parent
    }
}

impl Scope for CombinedScope {
    fn find_ref(&self, name: &Symbol) -> Option<Ref> {
        self.local
            .find_ref(name)
            .or_else(|| self.parent.find_ref(name))
    }

    fn def(&self, name: Symbol, value: Value) -> EvalResult<Ref> {
        self.local.def(name, value)
    }

    fn val(&self, name: Symbol, value: Value) -> EvalResult<Ref> {
        self.local.val(name, value)
    }
}
