//! Built-in methods on `String`, `List` and `Map`.

use super::ParamKind::{Any, Int, Str};
use super::{HostRegistry, Signature};
use crate::errors::{index_out_of_bounds, type_mismatch, EvalResult};
use crate::value::{HostValue, MapKey, SharedList, SharedMap};
use crate::Value;

pub(super) fn register(registry: &mut HostRegistry) {
    register_string(registry);
    register_list(registry);
    register_map(registry);
}

fn len_value(len: usize) -> HostValue {
    HostValue::Int(i64::try_from(len).unwrap_or(i64::MAX))
}

fn receiver_str(receiver: &Value) -> EvalResult<&str> {
    receiver
        .as_str()
        .ok_or_else(|| type_mismatch("String", receiver.type_name()))
}

fn receiver_list(receiver: &Value) -> EvalResult<&SharedList> {
    match receiver {
        Value::List(items) => Ok(items),
        other => Err(type_mismatch("List", other.type_name())),
    }
}

fn receiver_map(receiver: &Value) -> EvalResult<&SharedMap> {
    match receiver {
        Value::Map(map) => Ok(map),
        other => Err(type_mismatch("Map", other.type_name())),
    }
}

fn str_arg(args: &[HostValue], index: usize) -> EvalResult<&str> {
    match args.get(index) {
        Some(HostValue::Str(s)) => Ok(s),
        Some(HostValue::Null) => Err(type_mismatch("String", "Null")),
        _ => Err(type_mismatch("String", "nothing")),
    }
}

fn int_arg(args: &[HostValue], index: usize) -> EvalResult<i64> {
    args.get(index)
        .and_then(HostValue::as_int)
        .ok_or_else(|| type_mismatch("Integer", "nothing"))
}

fn value_arg(args: &[HostValue], index: usize) -> Value {
    args.get(index)
        .cloned()
        .map_or(Value::Null, Value::from_host)
}

fn key_arg(args: &[HostValue], index: usize) -> EvalResult<MapKey> {
    MapKey::from_value(&value_arg(args, index))
}

fn char_range(s: &str, start: i64, end: i64) -> EvalResult<HostValue> {
    let len = s.chars().count();
    let bound = |i: i64| usize::try_from(i).ok().filter(|&i| i <= len);
    let (Some(from), Some(to)) = (bound(start), bound(end)) else {
        return Err(index_out_of_bounds(if start < 0 { start } else { end }, len));
    };
    if from > to {
        return Err(index_out_of_bounds(start, len));
    }
    Ok(HostValue::Str(s.chars().skip(from).take(to - from).collect()))
}

fn register_string(r: &mut HostRegistry) {
    r.register_method("String", "size", Signature::empty(), |recv, _| {
        Ok(len_value(receiver_str(recv)?.chars().count()))
    })
    .register_method("String", "isEmpty", Signature::empty(), |recv, _| {
        Ok(HostValue::Bool(receiver_str(recv)?.is_empty()))
    })
    .register_method("String", "toUpperCase", Signature::empty(), |recv, _| {
        Ok(HostValue::Str(receiver_str(recv)?.to_uppercase()))
    })
    .register_method("String", "toLowerCase", Signature::empty(), |recv, _| {
        Ok(HostValue::Str(receiver_str(recv)?.to_lowercase()))
    })
    .register_method("String", "trim", Signature::empty(), |recv, _| {
        Ok(HostValue::from(receiver_str(recv)?.trim()))
    })
    .register_method("String", "contains", Signature::new([Str]), |recv, args| {
        Ok(HostValue::Bool(receiver_str(recv)?.contains(str_arg(args, 0)?)))
    })
    .register_method("String", "startsWith", Signature::new([Str]), |recv, args| {
        Ok(HostValue::Bool(receiver_str(recv)?.starts_with(str_arg(args, 0)?)))
    })
    .register_method("String", "endsWith", Signature::new([Str]), |recv, args| {
        Ok(HostValue::Bool(receiver_str(recv)?.ends_with(str_arg(args, 0)?)))
    })
    .register_method("String", "split", Signature::new([Str]), |recv, args| {
        let parts = receiver_str(recv)?
            .split(str_arg(args, 0)?)
            .map(HostValue::from)
            .collect();
        Ok(HostValue::Seq(parts))
    })
    .register_method("String", "replace", Signature::new([Str, Str]), |recv, args| {
        let replaced = receiver_str(recv)?.replace(str_arg(args, 0)?, str_arg(args, 1)?);
        Ok(HostValue::Str(replaced))
    })
    .register_method("String", "substring", Signature::new([Int]), |recv, args| {
        let s = receiver_str(recv)?;
        let end = i64::try_from(s.chars().count()).unwrap_or(i64::MAX);
        char_range(s, int_arg(args, 0)?, end)
    })
    .register_method("String", "substring", Signature::new([Int, Int]), |recv, args| {
        char_range(receiver_str(recv)?, int_arg(args, 0)?, int_arg(args, 1)?)
    });
}

fn register_list(r: &mut HostRegistry) {
    r.register_method("List", "size", Signature::empty(), |recv, _| {
        Ok(len_value(receiver_list(recv)?.read().len()))
    })
    .register_method("List", "isEmpty", Signature::empty(), |recv, _| {
        Ok(HostValue::Bool(receiver_list(recv)?.read().is_empty()))
    })
    .register_method("List", "contains", Signature::new([Any]), |recv, args| {
        let needle = value_arg(args, 0);
        Ok(HostValue::Bool(receiver_list(recv)?.read().contains(&needle)))
    })
    .register_method("List", "add", Signature::new([Any]), |recv, args| {
        receiver_list(recv)?.write().push(value_arg(args, 0));
        Ok(HostValue::Bool(true))
    })
    .register_method("List", "get", Signature::new([Int]), |recv, args| {
        let items = receiver_list(recv)?.read();
        let index = int_arg(args, 0)?;
        usize::try_from(index)
            .ok()
            .and_then(|i| items.get(i))
            .map(Value::to_host_value)
            .ok_or_else(|| index_out_of_bounds(index, items.len()))
    })
    .register_method("List", "join", Signature::empty(), |recv, _| {
        Ok(HostValue::Str(join(receiver_list(recv)?, "")))
    })
    .register_method("List", "join", Signature::new([Str]), |recv, args| {
        Ok(HostValue::Str(join(receiver_list(recv)?, str_arg(args, 0)?)))
    })
    .register_method("List", "reverse", Signature::empty(), |recv, _| {
        let items = receiver_list(recv)?.read();
        Ok(HostValue::Seq(items.iter().rev().map(Value::to_host_value).collect()))
    });
}

fn join(items: &SharedList, separator: &str) -> String {
    let items = items.read();
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(&item.to_string());
    }
    out
}

fn register_map(r: &mut HostRegistry) {
    r.register_method("Map", "size", Signature::empty(), |recv, _| {
        Ok(len_value(receiver_map(recv)?.read().len()))
    })
    .register_method("Map", "isEmpty", Signature::empty(), |recv, _| {
        Ok(HostValue::Bool(receiver_map(recv)?.read().is_empty()))
    })
    .register_method("Map", "containsKey", Signature::new([Any]), |recv, args| {
        let key = key_arg(args, 0)?;
        Ok(HostValue::Bool(receiver_map(recv)?.read().contains_key(&key)))
    })
    .register_method("Map", "get", Signature::new([Any]), |recv, args| {
        let key = key_arg(args, 0)?;
        let map = receiver_map(recv)?.read();
        Ok(map.get(&key).map_or(HostValue::Null, Value::to_host_value))
    })
    .register_method("Map", "put", Signature::new([Any, Any]), |recv, args| {
        let key = key_arg(args, 0)?;
        let previous = receiver_map(recv)?.write().insert(key, value_arg(args, 1));
        Ok(previous.map_or(HostValue::Null, |v| v.to_host_value()))
    })
    .register_method("Map", "remove", Signature::new([Any]), |recv, args| {
        let key = key_arg(args, 0)?;
        let removed = receiver_map(recv)?.write().remove(&key);
        Ok(removed.map_or(HostValue::Null, |v| v.to_host_value()))
    })
    .register_method("Map", "keys", Signature::empty(), |recv, _| {
        let entries = recv.map_entries().unwrap_or_default();
        Ok(HostValue::Seq(
            entries.iter().map(|(k, _)| k.to_value().to_host_value()).collect(),
        ))
    })
    .register_method("Map", "values", Signature::empty(), |recv, _| {
        let entries = recv.map_entries().unwrap_or_default();
        Ok(HostValue::Seq(
            entries.iter().map(|(_, v)| v.to_host_value()).collect(),
        ))
    });
}
