//! References: gettable/settable named slots.
//!
//! Scopes hand out `Ref`s instead of values so that assignment, compound
//! lookups and lazy definition all go through one interface.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use quill_ir::Symbol;

use crate::errors::{cannot_assign_immutable, list_too_large, undefined_property, EvalResult};
use crate::host::HostObject;
use crate::scope::SharedScope;
use crate::value::{MapKey, SharedList, SharedMap};
use crate::Value;

/// Most `null` elements a single write past the end of a list may insert.
///
/// Larger gaps fail with [`EvalErrorKind::ListTooLarge`](crate::EvalErrorKind::ListTooLarge),
/// as does a write whose storage cannot be reserved.
pub const MAX_LIST_PADDING: usize = 1 << 20;

/// A mutable binding cell, shared by every `Ref` that points at it.
pub struct Variable {
    name: Symbol,
    value: RwLock<Value>,
}

impl Variable {
    pub fn name(&self) -> &Symbol {
        &self.name
    }

    pub fn get(&self) -> Value {
        self.value.read().clone()
    }

    pub fn set(&self, value: Value) {
        *self.value.write() = value;
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable({})", self.name)
    }
}

/// A named slot.
#[derive(Clone)]
pub enum Ref {
    /// Immutable binding (`val`).
    Value { name: Symbol, value: Value },
    /// Mutable binding (`var`, parameters, auto-defined names).
    Variable(Arc<Variable>),
    /// Unbound name. Reading fails; writing defines it in `owner`.
    Undefined { name: Symbol, owner: SharedScope },
    /// Map entry, present or not.
    Entry { map: SharedMap, key: MapKey },
    /// List element; the index is already normalized to be non-negative.
    Element { list: SharedList, index: usize },
    /// Property of a host object.
    Property {
        object: Arc<dyn HostObject>,
        name: Symbol,
    },
}

impl Ref {
    pub fn value(name: Symbol, value: Value) -> Ref {
        Ref::Value { name, value }
    }

    pub fn variable(name: Symbol, value: Value) -> Ref {
        Ref::Variable(Arc::new(Variable {
            name,
            value: RwLock::new(value),
        }))
    }

    /// True only for [`Ref::Undefined`].
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Ref::Undefined { .. })
    }

    pub fn is_mutable(&self) -> bool {
        !matches!(self, Ref::Value { .. })
    }

    pub fn get(&self) -> EvalResult {
        match self {
            Ref::Value { value, .. } => Ok(value.clone()),
            Ref::Variable(var) => Ok(var.get()),
            Ref::Undefined { name, .. } => Err(undefined_property(name)),
            Ref::Entry { map, key } => Ok(map.read().get(key).cloned().unwrap_or(Value::Null)),
            Ref::Element { list, index } => {
                Ok(list.read().get(*index).cloned().unwrap_or(Value::Null))
            }
            Ref::Property { object, name } => match object.property(name.as_str()) {
                Some(value) => Ok(Value::from_host(value)),
                None => Err(undefined_property(name)),
            },
        }
    }

    pub fn set(&self, value: Value) -> EvalResult<()> {
        match self {
            Ref::Value { name, .. } => Err(cannot_assign_immutable(name.as_str())),
            Ref::Variable(var) => {
                var.set(value);
                Ok(())
            }
            Ref::Undefined { name, owner } => owner.def(name.clone(), value).map(drop),
            Ref::Entry { map, key } => {
                map.write().insert(key.clone(), value);
                Ok(())
            }
            Ref::Element { list, index } => {
                let mut items = list.write();
                if let Some(slot) = items.get_mut(*index) {
                    *slot = value;
                } else if !value.is_null() {
                    let len = items.len();
                    let padding = *index - len;
                    if padding > MAX_LIST_PADDING {
                        return Err(list_too_large(*index, len, MAX_LIST_PADDING));
                    }
                    items
                        .try_reserve(padding + 1)
                        .map_err(|_| list_too_large(*index, len, MAX_LIST_PADDING))?;
                    items.resize(*index, Value::Null);
                    items.push(value);
                }
                Ok(())
            }
            Ref::Property { object, name } => {
                if object.set_property(name.as_str(), value.to_host_value())? {
                    Ok(())
                } else {
                    Err(cannot_assign_immutable(name.as_str()))
                }
            }
        }
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ref::Value { name, value } => write!(f, "Ref::Value({name} = {value:?})"),
            Ref::Variable(var) => write!(f, "Ref::Variable({})", var.name),
            Ref::Undefined { name, .. } => write!(f, "Ref::Undefined({name})"),
            Ref::Entry { key, .. } => write!(f, "Ref::Entry({key})"),
            Ref::Element { index, .. } => write!(f, "Ref::Element({index})"),
            Ref::Property { name, .. } => write!(f, "Ref::Property({name})"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::errors::{EvalErrorKind, ScopeError};
    use crate::scope::IsolatedScope;
    use crate::Scope;

    fn sym(name: &str) -> Symbol {
        Symbol::intern(name)
    }

    #[test]
    fn test_value_ref_is_immutable() {
        let r = Ref::value(sym("x"), Value::Int(1));
        let err = r.set(Value::Int(2)).unwrap_err();
        assert!(matches!(
            err.kind,
            EvalErrorKind::Scope(ScopeError::Immutable { ref name }) if name == "x"
        ));
        assert_eq!(err.to_string(), "`x` is immutable");
        assert_eq!(r.get().ok(), Some(Value::Int(1)));
    }

    #[test]
    fn test_variable_ref_is_shared() {
        let r = Ref::variable(sym("x"), Value::Int(1));
        let alias = r.clone();
        alias.set(Value::Int(5)).unwrap();
        assert_eq!(r.get().ok(), Some(Value::Int(5)));
    }

    #[test]
    fn test_undefined_ref_promotes_on_set() {
        let owner = SharedScope::new(IsolatedScope::new());
        let r = Ref::Undefined {
            name: sym("fresh"),
            owner: owner.clone(),
        };
        assert!(r.is_undefined());
        let err = r.get().unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::UndefinedProperty { .. }));

        r.set(Value::Int(3)).unwrap();
        let bound = owner.find_ref(&sym("fresh")).unwrap();
        assert!(!bound.is_undefined());
        assert!(bound.is_mutable());
        assert_eq!(bound.get().ok(), Some(Value::Int(3)));
    }

    #[test]
    fn test_element_ref_pads_with_null() {
        let list = Value::list(vec![Value::Int(0)]);
        let Value::List(items) = &list else {
            unreachable!()
        };
        let r = Ref::Element {
            list: Arc::clone(items),
            index: 3,
        };
        assert_eq!(r.get().ok(), Some(Value::Null));
        r.set(Value::Int(9)).unwrap();
        assert_eq!(
            list.list_items(),
            Some(vec![Value::Int(0), Value::Null, Value::Null, Value::Int(9)])
        );
    }

    #[test]
    fn test_element_ref_rejects_huge_padding() {
        let list = Value::list(vec![Value::Int(0)]);
        let Value::List(items) = &list else {
            unreachable!()
        };
        let far = Ref::Element {
            list: Arc::clone(items),
            index: usize::MAX,
        };
        let err = far.set(Value::Int(1)).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::ListTooLarge {
                index: usize::MAX,
                len: 1,
                limit: MAX_LIST_PADDING,
            }
        );

        let just_over = Ref::Element {
            list: Arc::clone(items),
            index: MAX_LIST_PADDING + 2,
        };
        assert!(just_over.set(Value::Int(1)).is_err());
        assert_eq!(list.list_items(), Some(vec![Value::Int(0)]));

        let at_limit = Ref::Element {
            list: Arc::clone(items),
            index: MAX_LIST_PADDING + 1,
        };
        at_limit.set(Value::Int(1)).unwrap();
        assert_eq!(items.read().len(), MAX_LIST_PADDING + 2);
    }

    #[test]
    fn test_element_ref_null_past_end_is_noop() {
        let list = Value::list(vec![Value::Int(0)]);
        let Value::List(items) = &list else {
            unreachable!()
        };
        let r = Ref::Element {
            list: Arc::clone(items),
            index: 5,
        };
        r.set(Value::Null).unwrap();
        assert_eq!(list.list_items(), Some(vec![Value::Int(0)]));
    }

    #[test]
    fn test_entry_ref_upserts() {
        let map = Value::map_from(Vec::<(MapKey, Value)>::new());
        let Value::Map(entries) = &map else {
            unreachable!()
        };
        let r = Ref::Entry {
            map: Arc::clone(entries),
            key: MapKey::from("k"),
        };
        assert_eq!(r.get().ok(), Some(Value::Null));
        r.set(Value::Int(1)).unwrap();
        r.set(Value::Int(2)).unwrap();
        assert_eq!(map.map_entries(), Some(vec![(MapKey::from("k"), Value::Int(2))]));
    }
}
