//! Tuples, list construction, indexing and iteration.

use std::sync::Arc;

use quill_ir::{ExprId, ExprRange};
use rustc_hash::FxHashMap;

use crate::completion::{flow, Completion, FlowResult};
use crate::context::EvalContext;
use crate::errors::{
    index_not_supported, index_out_of_bounds, not_iterable, type_mismatch, EvalResult,
};
use crate::reference::Ref;
use crate::value::MapKey;
use crate::Value;

impl EvalContext<'_> {
    pub(super) fn exec_tuple(&mut self, elements: ExprRange) -> FlowResult {
        let values = flow!(self.exec_all(elements));
        Ok(Completion::Completed(Value::tuple(values)))
    }

    /// `[inner]`, collapsing the inner value.
    pub(super) fn exec_list(&mut self, inner: ExprId) -> FlowResult {
        let Some(inner) = inner.valid() else {
            return Ok(Completion::Completed(Value::list(Vec::new())));
        };
        let value = flow!(self.exec(inner));
        Ok(Completion::Completed(collapse(value)?))
    }

    /// Slot addressed by `target[key]`.
    pub(super) fn exec_index_ref(&mut self, target: ExprId, key: ExprId) -> FlowResult<Ref> {
        let target = flow!(self.exec(target));
        let key = flow!(self.exec(key));
        Ok(Completion::Completed(index_ref(&target, &key)?))
    }
}

/// Collapse the value inside `[..]`:
/// - a tuple of associations becomes a map (later labels win)
/// - a single association becomes a one-entry map
/// - any other tuple becomes a list of its elements
/// - any other value becomes a one-element list
pub(crate) fn collapse(value: Value) -> EvalResult {
    match value {
        Value::Tuple(items) if !items.is_empty() && items.iter().all(is_assoc) => {
            let mut entries = FxHashMap::default();
            for item in items.iter() {
                if let Value::Assoc(pair) = item {
                    entries.insert(MapKey::from_value(&pair.label)?, pair.value.clone());
                }
            }
            Ok(Value::map(entries))
        }
        Value::Tuple(items) => Ok(Value::list(items.to_vec())),
        Value::Assoc(pair) => Ok(Value::map_from([(
            MapKey::from_value(&pair.label)?,
            pair.value.clone(),
        )])),
        single => Ok(Value::list(vec![single])),
    }
}

fn is_assoc(value: &Value) -> bool {
    matches!(value, Value::Assoc(_))
}

/// Resolve `target[key]` to a live slot.
///
/// Negative list indices count from the end; an index before the start is
/// out of bounds. Indices past the end are allowed: reads yield `null` and
/// writes extend the list.
pub(crate) fn index_ref(target: &Value, key: &Value) -> EvalResult<Ref> {
    match target {
        Value::Map(map) => Ok(Ref::Entry {
            map: Arc::clone(map),
            key: MapKey::from_value(key)?,
        }),
        Value::List(list) => {
            let Value::Int(raw) = key else {
                return Err(type_mismatch("Integer", key.type_name()));
            };
            let len = list.read().len();
            let index = if *raw < 0 {
                i64::try_from(len)
                    .ok()
                    .and_then(|len| usize::try_from(len + raw).ok())
            } else {
                usize::try_from(*raw).ok()
            };
            match index {
                Some(index) => Ok(Ref::Element {
                    list: Arc::clone(list),
                    index,
                }),
                None => Err(index_out_of_bounds(*raw, len)),
            }
        }
        other => Err(index_not_supported(other.type_name())),
    }
}

/// Snapshot of the values a `for` loop visits.
///
/// Maps yield `key -> value` associations in key order; strings yield
/// one-character strings; `null` yields nothing.
pub(crate) fn iteration_items(value: &Value) -> EvalResult<Vec<Value>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::List(items) => Ok(items.read().clone()),
        Value::Tuple(items) => Ok(items.to_vec()),
        Value::Map(_) => Ok(value
            .map_entries()
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| Value::assoc(key.to_value(), value))
            .collect()),
        Value::Str(s) => Ok(s
            .chars()
            .map(|c| Value::from(c.to_string()))
            .collect()),
        other => Err(not_iterable(other.type_name())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::errors::EvalErrorKind;

    fn pair(label: &str, value: i64) -> Value {
        Value::assoc(Value::from(label), Value::Int(value))
    }

    #[test]
    fn test_collapse_all_assocs_into_map() {
        let map = collapse(Value::tuple(vec![pair("a", 1), pair("b", 2)])).unwrap();
        assert_eq!(
            map.map_entries(),
            Some(vec![
                (MapKey::from("a"), Value::Int(1)),
                (MapKey::from("b"), Value::Int(2)),
            ])
        );
    }

    #[test]
    fn test_collapse_mixed_into_list() {
        let list = collapse(Value::tuple(vec![pair("a", 1), Value::Int(2)])).unwrap();
        let items = list.list_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], pair("a", 1));
        assert_eq!(items[1], Value::Int(2));
    }

    #[test]
    fn test_collapse_single_values() {
        assert_eq!(
            collapse(Value::Int(1)).unwrap().list_items(),
            Some(vec![Value::Int(1)])
        );
        assert_eq!(
            collapse(pair("k", 1)).unwrap().map_entries(),
            Some(vec![(MapKey::from("k"), Value::Int(1))])
        );
    }

    #[test]
    fn test_negative_index_counts_from_end() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let slot = index_ref(&list, &Value::Int(-1)).unwrap();
        assert_eq!(slot.get().unwrap(), Value::Int(3));
        let err = index_ref(&list, &Value::Int(-4)).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::IndexOutOfBounds { index: -4, len: 3 });
    }

    #[test]
    fn test_index_errors() {
        let list = Value::list(Vec::new());
        assert!(matches!(
            index_ref(&list, &Value::from("x")).unwrap_err().kind,
            EvalErrorKind::TypeMismatch { .. }
        ));
        assert!(matches!(
            index_ref(&Value::Int(1), &Value::Int(0)).unwrap_err().kind,
            EvalErrorKind::IndexNotSupported { .. }
        ));
    }

    #[test]
    fn test_iteration_items() {
        let map = Value::map_from([(MapKey::from("b"), Value::Int(2)), (MapKey::from("a"), Value::Int(1))]);
        assert_eq!(iteration_items(&map).unwrap(), vec![pair("a", 1), pair("b", 2)]);
        assert_eq!(
            iteration_items(&Value::from("hi")).unwrap(),
            vec![Value::from("h"), Value::from("i")]
        );
        assert!(iteration_items(&Value::Null).unwrap().is_empty());
        assert!(matches!(
            iteration_items(&Value::Int(3)).unwrap_err().kind,
            EvalErrorKind::NotIterable { .. }
        ));
    }
}
