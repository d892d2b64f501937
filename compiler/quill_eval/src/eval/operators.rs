//! Binary and unary operator implementations.
//!
//! Direct enum dispatch over the operand pair. Short-circuit operators
//! (`&&`, `||`, `??`) never reach this module: the evaluator decides whether
//! to evaluate their right operand.

use std::cmp::Ordering;

use quill_ir::{BinaryOp, UnaryOp};
use rustc_hash::FxHashMap;

use crate::errors::{
    binary_type_mismatch, division_by_zero, integer_overflow, invalid_binary_op, invalid_unary_op,
    EvalResult,
};
use crate::value::{MapKey, SharedList, SharedMap};
use crate::Value;

/// Evaluate a strict binary operation.
pub(crate) fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => return Ok(Value::Bool(left != right)),
        _ => {}
    }
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Float(a), Value::Float(b)) => eval_float_binary(*a, *b, op),
        (Value::Int(a), Value::Float(b)) => eval_float_binary(to_float(*a), *b, op),
        (Value::Float(a), Value::Int(b)) => eval_float_binary(*a, to_float(*b), op),
        (Value::Str(a), Value::Str(b)) => eval_string_binary(a, b, op),
        (Value::Str(_), _) | (_, Value::Str(_)) if op == BinaryOp::Add => {
            Ok(Value::from(format!("{left}{right}")))
        }
        (Value::List(a), Value::List(b)) if op == BinaryOp::Add => Ok(concat_lists(a, b)),
        (Value::Map(a), Value::Map(b)) if op == BinaryOp::Add => Ok(merge_maps(a, b)),
        _ if left.type_name() == right.type_name() => {
            Err(invalid_binary_op(left.type_name(), op))
        }
        _ => Err(binary_type_mismatch(op, left.type_name(), right.type_name())),
    }
}

#[allow(clippy::cast_precision_loss, reason = "mixed arithmetic promotes to float")]
#[inline]
fn to_float(n: i64) -> f64 {
    n as f64
}

#[inline]
fn checked(result: Option<i64>, op_name: &'static str) -> EvalResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op_name))
}

/// Integers: checked arithmetic, truncating division.
fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked(a.checked_mul(b), "multiplication"),
        BinaryOp::Div if b == 0 => Err(division_by_zero()),
        BinaryOp::Div => checked(a.checked_div(b), "division"),
        BinaryOp::Mod if b == 0 => Err(division_by_zero()),
        BinaryOp::Mod => checked(a.checked_rem(b), "remainder"),
        _ => compare(a.cmp(&b), op).ok_or_else(|| invalid_binary_op("Integer", op)),
    }
}

fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div => Ok(Value::Float(a / b)),
        BinaryOp::Mod => Ok(Value::Float(a % b)),
        // NaN is unordered: every ordering comparison is false.
        _ => match a.partial_cmp(&b) {
            Some(ordering) => compare(ordering, op).ok_or_else(|| invalid_binary_op("Float", op)),
            None => Ok(Value::Bool(false)),
        },
    }
}

fn eval_string_binary(a: &str, b: &str, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::from(joined))
        }
        _ => compare(a.cmp(b), op).ok_or_else(|| invalid_binary_op("String", op)),
    }
}

/// Ordering operators; `None` for anything else.
fn compare(ordering: Ordering, op: BinaryOp) -> Option<Value> {
    let result = match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::GtEq => ordering != Ordering::Less,
        _ => return None,
    };
    Some(Value::Bool(result))
}

/// `a + b` on lists builds a new list; neither operand changes.
fn concat_lists(a: &SharedList, b: &SharedList) -> Value {
    let mut items = a.read().clone();
    items.extend(b.read().iter().cloned());
    Value::list(items)
}

/// `a + b` on maps builds a new map; entries of `b` win.
fn merge_maps(a: &SharedMap, b: &SharedMap) -> Value {
    let mut entries: FxHashMap<MapKey, Value> = a.read().clone();
    entries.extend(b.read().iter().map(|(k, v)| (k.clone(), v.clone())));
    Value::map(entries)
}

/// Evaluate a unary operation.
pub(crate) fn evaluate_unary(value: &Value, op: UnaryOp) -> EvalResult {
    match (value, op) {
        (Value::Int(n), UnaryOp::Neg) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (Value::Float(x), UnaryOp::Neg) => Ok(Value::Float(-x)),
        (_, UnaryOp::Not) => Ok(Value::Bool(!value.is_truthy())),
        _ => Err(invalid_unary_op(value.type_name(), op)),
    }
}
