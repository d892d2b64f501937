#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::sync::Arc;

use parking_lot::RwLock;
use pretty_assertions::assert_eq;

use super::*;
use crate::errors::{EvalErrorKind, ScopeError};
use crate::host::{HostObject, HostRegistry, Signature};
use crate::shared::SharedRegistry;
use crate::value::{HostValue, MapKey, SharedMap};

fn sym(name: &str) -> Symbol {
    Symbol::intern(name)
}

#[test]
fn test_isolated_def_val_set() {
    let scope = IsolatedScope::new();
    scope.def(sym("x"), Value::Int(1)).unwrap();
    scope.val(sym("y"), Value::Int(2)).unwrap();

    scope.set(&sym("x"), Value::Int(10)).unwrap();
    assert_eq!(scope.get(&sym("x")).unwrap(), Value::Int(10));

    let err = scope.set(&sym("y"), Value::Int(20)).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::Scope(ScopeError::Immutable {
            name: "y".to_string()
        })
    );
    assert_eq!(scope.get(&sym("y")).unwrap(), Value::Int(2));
}

#[test]
fn test_isolated_set_auto_defines() {
    let scope = IsolatedScope::new();
    assert!(scope.find_ref(&sym("fresh")).is_none());
    scope.set(&sym("fresh"), Value::Int(1)).unwrap();
    let slot = scope.find_ref(&sym("fresh")).unwrap();
    assert!(slot.is_mutable());
    assert_eq!(slot.get().unwrap(), Value::Int(1));
}

#[test]
fn test_undefined_get_fails() {
    let scope = IsolatedScope::new();
    let err = scope.get(&sym("missing")).unwrap_err();
    assert_eq!(err.to_string(), "`missing` is undefined");
}

#[test]
fn test_combined_shadowing() {
    let parent = SharedScope::new(IsolatedScope::new());
    parent.def(sym("x"), Value::Int(1)).unwrap();
    parent.def(sym("only_parent"), Value::Int(7)).unwrap();

    let local = SharedScope::new(IsolatedScope::new());
    local.def(sym("x"), Value::Int(2)).unwrap();

    let combined = CombinedScope::new(local.clone(), parent.clone());
    assert_eq!(combined.get(&sym("x")).unwrap(), Value::Int(2));
    assert_eq!(combined.get(&sym("only_parent")).unwrap(), Value::Int(7));
    assert_eq!(parent.get(&sym("x")).unwrap(), Value::Int(1));
}

#[test]
fn test_combined_set_writes_through_parent() {
    let parent = SharedScope::new(IsolatedScope::new());
    parent.def(sym("count"), Value::Int(0)).unwrap();
    let local = SharedScope::new(IsolatedScope::new());
    let combined = CombinedScope::new(local.clone(), parent.clone());

    combined.set(&sym("count"), Value::Int(5)).unwrap();
    assert_eq!(parent.get(&sym("count")).unwrap(), Value::Int(5));
    assert!(local.find_ref(&sym("count")).is_none());

    combined.set(&sym("new_name"), Value::Int(1)).unwrap();
    assert!(local.find_ref(&sym("new_name")).is_some());
    assert!(parent.find_ref(&sym("new_name")).is_none());
}

#[test]
fn test_lookup_promotes_into_owner() {
    let scope = SharedScope::new(IsolatedScope::new());
    let slot = scope.lookup(&sym("later"));
    assert!(slot.is_undefined());
    slot.set(Value::from("now")).unwrap();
    assert_eq!(scope.get(&sym("later")).unwrap(), Value::from("now"));
}

#[test]
fn test_set_all() {
    let scope = IsolatedScope::new();
    scope
        .set_all(&[(sym("a"), Value::Int(1)), (sym("b"), Value::Int(2))])
        .unwrap();
    assert_eq!(scope.len(), 2);
    assert!(scope.contains(&sym("b")));
}

#[test]
fn test_map_scope_live_entries() {
    let map: SharedMap = Arc::new(RwLock::new(Default::default()));
    let scope = MapScope::new(Arc::clone(&map));

    let slot = scope.find_ref(&sym("title")).unwrap();
    assert!(!slot.is_undefined());
    assert_eq!(slot.get().unwrap(), Value::Null);

    scope.set(&sym("title"), Value::from("Home")).unwrap();
    assert_eq!(map.read().get(&MapKey::from("title")), Some(&Value::from("Home")));

    let err = scope.def(sym("x"), Value::Int(1)).unwrap_err();
    assert!(matches!(
        err.kind,
        EvalErrorKind::Scope(ScopeError::Unsupported { operation: "def", .. })
    ));
    assert!(scope.val(sym("x"), Value::Int(1)).is_err());
}


#[derive(Debug)]
struct Point {
    x: RwLock<i64>,
}

impl HostObject for Point {
    fn type_name(&self) -> &str {
        "Point"
    }

    fn property(&self, name: &str) -> Option<HostValue> {
        (name == "x").then(|| HostValue::Int(*self.x.read()))
    }

    fn set_property(&self, name: &str, value: HostValue) -> crate::errors::EvalResult<bool> {
        match (name, value) {
            ("x", HostValue::Int(n)) => {
                *self.x.write() = n;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

fn point_registry() -> SharedRegistry<HostRegistry> {
    let mut registry = HostRegistry::new();
    registry.register_method("Point", "norm", Signature::empty(), |_, _| {
        Ok(HostValue::Int(0))
    });
    SharedRegistry::new(registry)
}

#[test]
fn test_object_scope_properties_and_methods() {
    let point = Arc::new(Point { x: RwLock::new(3) });
    let scope = ObjectScope::new(point.clone(), point_registry());

    assert_eq!(scope.get(&sym("x")).unwrap(), Value::Int(3));
    scope.set(&sym("x"), Value::Int(4)).unwrap();
    assert_eq!(*point.x.read(), 4);

    let method = scope.find_ref(&sym("norm")).unwrap();
    assert!(!method.is_mutable());
    assert!(matches!(method.get().unwrap(), Value::Function(_)));

    assert!(scope.find_ref(&sym("y")).is_none());
    assert!(scope.def(sym("y"), Value::Int(1)).is_err());
}

#[test]
fn test_global_scope_registers_host_functions() {
    let globals = GlobalScope::new();
    globals.register_function(crate::function::HostFunction::new("twice", |args| {
        Ok(HostValue::Int(args[0].as_int().unwrap_or(0) * 2))
    }));
    let slot = globals.find_ref(&sym("twice")).unwrap();
    assert!(!slot.is_mutable());
    assert!(matches!(slot.get().unwrap(), Value::Function(_)));
}

#[test]
fn test_shared_scope_ptr_eq() {
    let a = SharedScope::new(IsolatedScope::new());
    let b = a.clone();
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&SharedScope::new(IsolatedScope::new())));
}
