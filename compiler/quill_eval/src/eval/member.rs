//! Member access: `target.name`.
//!
//! Three entry points share the same targets but differ in what they yield:
//! - [`EvalContext::member_value`] reads a value
//! - [`EvalContext::member_callee`] yields something callable, preferring
//!   registered methods over data
//! - [`EvalContext::member_ref`] yields an assignable slot

use std::sync::Arc;

use quill_ir::Symbol;

use crate::context::EvalContext;
use crate::errors::{invalid_assignment_target, undefined_property, EvalResult};
use crate::function::FunctionValue;
use crate::reference::Ref;
use crate::scope::Scope;
use crate::value::MapKey;
use crate::Value;

impl EvalContext<'_> {
    /// `target.name` as a value: module member, map entry (`null` when
    /// absent), host property, static field, or a bound method.
    pub(crate) fn member_value(&self, target: &Value, name: &Symbol) -> EvalResult {
        match target {
            Value::Module(module) => module.scope().get(name),
            Value::Map(map) => Ok(map
                .read()
                .get(&MapKey::str(name.as_str()))
                .cloned()
                .unwrap_or(Value::Null)),
            Value::Object(object) => match object.property(name.as_str()) {
                Some(value) => Ok(Value::from_host(value)),
                None => self.bound_method(target, name),
            },
            Value::Type(ty) => {
                if let Some(field) = self.registry.static_field(ty.symbol(), name) {
                    return Ok(field);
                }
                if self.registry.has_static(ty.symbol(), name) {
                    return Ok(FunctionValue::bound_static(ty.clone(), name.clone()).into());
                }
                Err(undefined_property(name))
            }
            _ => self.bound_method(target, name),
        }
    }

    /// `target.name` in call position.
    ///
    /// Registered methods win over data; a member that is itself a function
    /// is returned as is. Anything else becomes a bound method so that the
    /// call reports the missing method with its argument types.
    pub(crate) fn member_callee(&self, target: &Value, name: &Symbol) -> EvalResult {
        match target {
            Value::Module(module) => module.scope().get(name),
            Value::Type(ty) => match self.registry.static_field(ty.symbol(), name) {
                Some(field @ Value::Function(_)) => Ok(field),
                _ => Ok(FunctionValue::bound_static(ty.clone(), name.clone()).into()),
            },
            _ if self.has_method(target, name) => {
                Ok(FunctionValue::bound(target.clone(), name.clone()).into())
            }
            Value::Map(_) | Value::Object(_) => match self.member_value(target, name) {
                Ok(member @ Value::Function(_)) => Ok(member),
                _ => Ok(FunctionValue::bound(target.clone(), name.clone()).into()),
            },
            _ => Ok(FunctionValue::bound(target.clone(), name.clone()).into()),
        }
    }

    /// `target.name` as an assignment target.
    pub(crate) fn member_ref(&self, target: &Value, name: &Symbol) -> EvalResult<Ref> {
        match target {
            Value::Module(module) => Ok(module.scope().lookup(name)),
            Value::Map(map) => Ok(Ref::Entry {
                map: Arc::clone(map),
                key: MapKey::str(name.as_str()),
            }),
            Value::Object(object) => Ok(Ref::Property {
                object: Arc::clone(object),
                name: name.clone(),
            }),
            // Static fields are constants.
            Value::Type(ty) => match self.registry.static_field(ty.symbol(), name) {
                Some(field) => Ok(Ref::value(name.clone(), field)),
                None => Err(undefined_property(name)),
            },
            other => Err(invalid_assignment_target(format_args!(
                "{}.{name}",
                other.type_name()
            ))),
        }
    }

    fn has_method(&self, target: &Value, name: &Symbol) -> bool {
        self.registry
            .has_method(&Symbol::intern(target.type_name()), name)
    }

    fn bound_method(&self, target: &Value, name: &Symbol) -> EvalResult {
        if self.has_method(target, name) {
            Ok(FunctionValue::bound(target.clone(), name.clone()).into())
        } else {
            Err(undefined_property(name))
        }
    }
}
