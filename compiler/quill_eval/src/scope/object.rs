use std::fmt;
use std::sync::Arc;

use quill_ir::Symbol;

use super::Scope;
use crate::errors::{unsupported_scope_operation, EvalResult};
use crate::function::FunctionValue;
use crate::host::{HostObject, HostRegistry};
use crate::reference::Ref;
use crate::shared::SharedRegistry;
use crate::Value;

/// Read-mostly scope over a host object.
///
/// Properties resolve to property refs (writable if the object allows it);
/// registered instance methods resolve to immutable bound-method values.
pub struct ObjectScope {
    object: Arc<dyn HostObject>,
    registry: SharedRegistry<HostRegistry>,
}

impl ObjectScope {
    pub fn new(object: Arc<dyn HostObject>, registry: SharedRegistry<HostRegistry>) -> Self {
        ObjectScope { object, registry }
    }
}

impl Scope for ObjectScope {
    fn find_ref(&self, name: &Symbol) -> Option<Ref> {
        if self.object.property(name.as_str()).is_some() {
            return Some(Ref::Property {
                object: Arc::clone(&self.object),
                name: name.clone(),
            });
        }
        let type_name = Symbol::intern(self.object.type_name());
        if self.registry.has_method(&type_name, name) {
            let receiver = Value::Object(Arc::clone(&self.object));
            let method = FunctionValue::bound(receiver, name.clone());
            return Some(Ref::value(name.clone(), Value::Function(method)));
        }
        None
    }

    fn def(&self, _name: Symbol, _value: Value) -> EvalResult<Ref> {
        Err(unsupported_scope_operation("def", "object"))
    }

    fn val(&self, _name: Symbol, _value: Value) -> EvalResult<Ref> {
        Err(unsupported_scope_operation("val", "object"))
    }
}

impl fmt::Debug for ObjectScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectScope({})", self.object.type_name())
    }
}
