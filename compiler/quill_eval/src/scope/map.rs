use std::fmt;
use std::sync::Arc;

use quill_ir::Symbol;

use super::Scope;
use crate::errors::{unsupported_scope_operation, EvalResult};
use crate::reference::Ref;
use crate::value::{MapKey, SharedMap};
use crate::Value;

/// Scope over an externally owned map.
///
/// Every name resolves to a live entry ref, so reads of absent keys yield
/// `null` and writes insert. Declarations are not supported.
#[derive(Clone)]
pub struct MapScope {
    map: SharedMap,
}

impl MapScope {
    pub fn new(map: SharedMap) -> Self {
        MapScope { map }
    }
}

impl Scope for MapScope {
    fn find_ref(&self, name: &Symbol) -> Option<Ref> {
        Some(Ref::Entry {
            map: Arc::clone(&self.map),
            key: MapKey::str(name.as_str()),
        })
    }

    fn def(&self, _name: Symbol, _value: Value) -> EvalResult<Ref> {
        Err(unsupported_scope_operation("def", "map"))
    }

    fn val(&self, _name: Symbol, _value: Value) -> EvalResult<Ref> {
        Err(unsupported_scope_operation("val", "map"))
    }
}

impl fmt::Debug for MapScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MapScope({} entries)", self.map.read().len())
    }
}
