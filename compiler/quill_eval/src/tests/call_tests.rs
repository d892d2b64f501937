use pretty_assertions::assert_eq;
use quill_ir::{BinaryOp, ExprArena, ExprId, Param, Symbol};

use super::run;
use crate::{EvalErrorKind, Value};

const NO_ARGS: [ExprId; 0] = [];

#[test]
fn test_closure_call() {
    // val f = (x) -> x + 1; f(5)
    let mut arena = ExprArena::new();
    let x = arena.ident("x");
    let one = arena.int(1);
    let body = arena.binary(BinaryOp::Add, x, one);
    let lambda = arena.lambda_named(&["x"], body);
    let decl = arena.let_val("f", lambda);
    let f = arena.ident("f");
    let five = arena.int(5);
    let call = arena.call(f, [five]);
    let root = arena.block([decl, call]);
    assert_eq!(run(arena, root).unwrap(), Value::Int(6));
}

#[test]
fn test_closures_share_captured_scope() {
    // var count = 0
    // val inc = () -> count = count + 1
    // inc(); inc(); count
    let mut arena = ExprArena::new();
    let zero = arena.int(0);
    let decl = arena.let_var("count", zero);
    let target = arena.ident("count");
    let count = arena.ident("count");
    let one = arena.int(1);
    let next = arena.binary(BinaryOp::Add, count, one);
    let body = arena.assign(target, next);
    let lambda = arena.lambda_named(&[], body);
    let decl_inc = arena.let_val("inc", lambda);
    let inc = arena.ident("inc");
    let first = arena.call(inc, NO_ARGS);
    let inc = arena.ident("inc");
    let second = arena.call(inc, NO_ARGS);
    let result = arena.ident("count");
    let root = arena.block([decl, decl_inc, first, second, result]);
    assert_eq!(run(arena, root).unwrap(), Value::Int(2));
}

#[test]
fn test_parameters_are_local() {
    // var x = 1; val f = (x) -> x = 10; f(0); x
    let mut arena = ExprArena::new();
    let one = arena.int(1);
    let decl = arena.let_var("x", one);
    let target = arena.ident("x");
    let ten = arena.int(10);
    let body = arena.assign(target, ten);
    let lambda = arena.lambda_named(&["x"], body);
    let decl_f = arena.let_val("f", lambda);
    let f = arena.ident("f");
    let zero = arena.int(0);
    let call = arena.call(f, [zero]);
    let result = arena.ident("x");
    let root = arena.block([decl, decl_f, call, result]);
    assert_eq!(run(arena, root).unwrap(), Value::Int(1));
}

#[test]
fn test_return_leaves_closure_early() {
    // val f = (n) -> { if (n > 0) return "pos"; "other" }; [f(1), f(0)]
    let mut arena = ExprArena::new();
    let n = arena.ident("n");
    let zero = arena.int(0);
    let cond = arena.binary(BinaryOp::Gt, n, zero);
    let pos = arena.str("pos");
    let ret = arena.ret(pos);
    let guard = arena.if_then(cond, ret);
    let other = arena.str("other");
    let body = arena.block([guard, other]);
    let lambda = arena.lambda_named(&["n"], body);
    let decl = arena.let_val("f", lambda);
    let f = arena.ident("f");
    let one = arena.int(1);
    let positive = arena.call(f, [one]);
    let f = arena.ident("f");
    let zero = arena.int(0);
    let non_positive = arena.call(f, [zero]);
    let result = arena.list_of([positive, non_positive]);
    let root = arena.block([decl, result]);
    assert_eq!(
        run(arena, root).unwrap().list_items(),
        Some(vec![Value::from("pos"), Value::from("other")])
    );
}

#[test]
fn test_spread_parameter() {
    // val f = (first, *rest) -> rest; f(1, 2, 3)
    let mut arena = ExprArena::new();
    let body = arena.ident("rest");
    let lambda = arena.lambda(
        [
            Param::new(Symbol::intern("first")),
            Param::spread(Symbol::intern("rest")),
        ],
        body,
    );
    let decl = arena.let_val("f", lambda);
    let f = arena.ident("f");
    let args = [1, 2, 3].map(|n| arena.int(n));
    let call = arena.call(f, args);
    let root = arena.block([decl, call]);
    assert_eq!(
        run(arena, root).unwrap().list_items(),
        Some(vec![Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn test_error_inside_closure_names_the_call_site() {
    // val f = (x) -> x / 0; f(5)
    let mut arena = ExprArena::new();
    let x = arena.ident("x");
    let zero = arena.int(0);
    let body = arena.binary(BinaryOp::Div, x, zero);
    let lambda = arena.lambda_named(&["x"], body);
    let decl = arena.let_val("f", lambda);
    let f = arena.ident("f");
    let five = arena.int(5);
    let call = arena.call(f, [five]);
    let root = arena.block([decl, call]);

    let err = run(arena, root).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    let stack = err.stack.unwrap();
    assert_eq!(stack.origin(), Some("x / 0"));
    assert_eq!(stack.frames()[0].name, "f");
    assert_eq!(stack.frames()[0].call_site.as_deref(), Some("f(5)"));
    assert_eq!(stack.frames()[1].name, "<script>");
}

#[test]
fn test_calling_a_non_function() {
    let mut arena = ExprArena::new();
    let callee = arena.int(3);
    let root = arena.call(callee, NO_ARGS);
    let err = run(arena, root).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::NotCallable {
            type_name: "Integer".to_string()
        }
    );
}

#[test]
fn test_break_escaping_closure_is_an_error() {
    // val f = () -> break; f()
    let mut arena = ExprArena::new();
    let body = arena.break_();
    let lambda = arena.lambda_named(&[], body);
    let decl = arena.let_val("f", lambda);
    let f = arena.ident("f");
    let call = arena.call(f, NO_ARGS);
    let root = arena.block([decl, call]);

    let err = run(arena, root).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::ControlOutsideLoop { keyword: "break" });
    assert_eq!(err.stack.unwrap().frames()[0].name, "f");
}

#[test]
fn test_anonymous_closure_frame_name() {
    // (() -> missing)()
    let mut arena = ExprArena::new();
    let body = arena.ident("missing");
    let lambda = arena.lambda_named(&[], body);
    let root = arena.call(lambda, NO_ARGS);
    let err = run(arena, root).unwrap_err();
    assert_eq!(err.stack.unwrap().frames()[0].name, "<closure>");
}
