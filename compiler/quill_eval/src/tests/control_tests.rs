use pretty_assertions::assert_eq;
use quill_ir::{BinaryOp, ExprArena};

use super::{run, run_with};
use crate::{Bindings, EvalErrorKind, InterruptHandle, MapKey, Value};

#[test]
fn test_while_with_break_and_continue() {
    // var i = 0; var sum = 0
    // while (true) {
    //   i = i + 1
    //   if (i > 5) break
    //   if (i == 3) continue
    //   sum = sum + i
    // }
    // sum
    let mut arena = ExprArena::new();
    let zero = arena.int(0);
    let decl_i = arena.let_var("i", zero);
    let zero = arena.int(0);
    let decl_sum = arena.let_var("sum", zero);

    let i_target = arena.ident("i");
    let i = arena.ident("i");
    let one = arena.int(1);
    let next = arena.binary(BinaryOp::Add, i, one);
    let step = arena.assign(i_target, next);

    let i = arena.ident("i");
    let five = arena.int(5);
    let past = arena.binary(BinaryOp::Gt, i, five);
    let brk = arena.break_();
    let stop = arena.if_then(past, brk);

    let i = arena.ident("i");
    let three = arena.int(3);
    let is_three = arena.binary(BinaryOp::Eq, i, three);
    let cont = arena.continue_();
    let skip = arena.if_then(is_three, cont);

    let sum_target = arena.ident("sum");
    let sum = arena.ident("sum");
    let i = arena.ident("i");
    let added = arena.binary(BinaryOp::Add, sum, i);
    let accumulate = arena.assign(sum_target, added);

    let body = arena.block([step, stop, skip, accumulate]);
    let forever = arena.bool(true);
    let looped = arena.while_loop(forever, body);
    let result = arena.ident("sum");
    let root = arena.block([decl_i, decl_sum, looped, result]);

    assert_eq!(run(arena, root).unwrap(), Value::Int(12));
}

#[test]
fn test_for_over_list_and_map() {
    // var out = ""; for (x in xs) out = out + x; for (e in m) out = out + e; out
    let mut arena = ExprArena::new();
    let empty = arena.str("");
    let decl = arena.let_var("out", empty);

    let target = arena.ident("out");
    let out = arena.ident("out");
    let x = arena.ident("x");
    let concat = arena.binary(BinaryOp::Add, out, x);
    let body = arena.assign(target, concat);
    let xs = arena.ident("xs");
    let over_list = arena.for_in("x", xs, body);

    let target = arena.ident("out");
    let out = arena.ident("out");
    let e = arena.ident("e");
    let concat = arena.binary(BinaryOp::Add, out, e);
    let body = arena.assign(target, concat);
    let m = arena.ident("m");
    let over_map = arena.for_in("e", m, body);

    let result = arena.ident("out");
    let root = arena.block([decl, over_list, over_map, result]);

    let bindings = Bindings::new()
        .with("xs", vec![Value::from("a"), Value::from("b")])
        .with(
            "m",
            Value::map_from([
                (MapKey::from("z"), Value::Int(2)),
                (MapKey::from("y"), Value::Int(1)),
            ]),
        );
    assert_eq!(
        run_with(arena, root, bindings).unwrap(),
        Value::from("ab\"y\" -> 1\"z\" -> 2")
    );
}

#[test]
fn test_loop_variable_does_not_leak() {
    // for (x in [1]) {}; x
    let mut arena = ExprArena::new();
    let one = arena.int(1);
    let list = arena.list(one);
    let body = arena.null();
    let looped = arena.for_in("x", list, body);
    let x = arena.ident("x");
    let root = arena.block([looped, x]);
    let err = run(arena, root).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedProperty {
            name: "x".to_string()
        }
    );
}

#[test]
fn test_for_over_non_iterable() {
    let mut arena = ExprArena::new();
    let five = arena.int(5);
    let body = arena.null();
    let root = arena.for_in("x", five, body);
    let err = run(arena, root).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::NotIterable {
            type_name: "Integer".to_string()
        }
    );
}

#[test]
fn test_return_inside_loop_ends_function() {
    // val find = (xs) -> { for (x in xs) if (x > 1) return x; null }; find([1, 2, 3])
    let mut arena = ExprArena::new();
    let x = arena.ident("x");
    let one = arena.int(1);
    let cond = arena.binary(BinaryOp::Gt, x, one);
    let x = arena.ident("x");
    let ret = arena.ret(x);
    let guard = arena.if_then(cond, ret);
    let xs = arena.ident("xs");
    let looped = arena.for_in("x", xs, guard);
    let none = arena.null();
    let body = arena.block([looped, none]);
    let lambda = arena.lambda_named(&["xs"], body);
    let decl = arena.let_val("find", lambda);
    let find = arena.ident("find");
    let items = [1, 2, 3].map(|n| arena.int(n));
    let list = arena.list_of(items);
    let call = arena.call(find, [list]);
    let root = arena.block([decl, call]);
    assert_eq!(run(arena, root).unwrap(), Value::Int(2));
}

#[test]
fn test_try_catch_thrown_value() {
    // try throw "boom" catch (e) "caught " + e
    let mut arena = ExprArena::new();
    let boom = arena.str("boom");
    let thrown = arena.throw(boom);
    let prefix = arena.str("caught ");
    let e = arena.ident("e");
    let handler = arena.binary(BinaryOp::Add, prefix, e);
    let root = arena.try_catch(thrown, "e", handler);
    assert_eq!(run(arena, root).unwrap(), Value::from("caught boom"));
}

#[test]
fn test_try_catch_evaluator_error_binds_message() {
    // try missing catch (e) e
    let mut arena = ExprArena::new();
    let body = arena.ident("missing");
    let handler = arena.ident("e");
    let root = arena.try_catch(body, "e", handler);
    assert_eq!(run(arena, root).unwrap(), Value::from("`missing` is undefined"));
}

#[test]
fn test_uncaught_throw_keeps_value() {
    let mut arena = ExprArena::new();
    let code = arena.int(42);
    let root = arena.throw(code);
    let err = run(arena, root).unwrap_err();
    assert_eq!(err.thrown, Some(Value::Int(42)));
    assert_eq!(err.to_string(), "42");
}

#[test]
fn test_interrupt_is_not_catchable() {
    // try { while (true) null } catch (e) "caught"
    let mut arena = ExprArena::new();
    let forever = arena.bool(true);
    let body = arena.null();
    let looped = arena.while_loop(forever, body);
    let caught = arena.str("caught");
    let root = arena.try_catch(looped, "e", caught);
    let program = quill_ir::Program::new(arena, root);

    let handle = InterruptHandle::new();
    handle.interrupt();
    let err = crate::EvalContext::builder(&program)
        .interrupt(handle)
        .build()
        .run()
        .unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::Interrupted);
}

#[test]
fn test_interrupt_from_another_thread() {
    // while (true) null
    let mut arena = ExprArena::new();
    let forever = arena.bool(true);
    let body = arena.null();
    let root = arena.while_loop(forever, body);
    let program = quill_ir::Program::new(arena, root);

    let handle = InterruptHandle::new();
    let remote = handle.clone();
    let stopper = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(20));
        remote.interrupt();
    });
    let err = crate::EvalContext::builder(&program)
        .interrupt(handle)
        .build()
        .run()
        .unwrap_err();
    stopper.join().unwrap();
    assert_eq!(err.kind, EvalErrorKind::Interrupted);
}
