//! End-to-end tests that build trees with the `quill_ir` builders and run
//! them through the public entry points.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

mod call_tests;
mod control_tests;

use std::sync::Arc;

use quill_ir::{ExprArena, ExprId, Program};

use crate::{evaluate, Bindings, EvalContext, EvalResult, GlobalScope, Value};

/// Finish a tree and evaluate it with no bindings against a private global
/// scope, so tests never share modules.
pub(super) fn run(arena: ExprArena, root: ExprId) -> EvalResult {
    run_with(arena, root, Bindings::new())
}

pub(super) fn run_with(arena: ExprArena, root: ExprId, bindings: Bindings) -> EvalResult {
    let program = Program::new(arena, root);
    EvalContext::builder(&program)
        .globals(GlobalScope::new())
        .bindings(bindings)
        .build()
        .run()
}

/// Evaluate against the given global scope.
pub(super) fn run_in(globals: &Arc<GlobalScope>, program: &Program) -> EvalResult {
    EvalContext::builder(program)
        .globals(Arc::clone(globals))
        .build()
        .run()
}

#[test]
fn test_evaluate_conditional_with_bindings() {
    // if (x > 3) "big" else "small"
    let mut arena = ExprArena::new();
    let x = arena.ident("x");
    let three = arena.int(3);
    let cond = arena.binary(quill_ir::BinaryOp::Gt, x, three);
    let big = arena.str("big");
    let small = arena.str("small");
    let root = arena.if_else(cond, big, small);
    let program = Program::new(arena, root);

    let bindings = Bindings::new().with("x", 5);
    assert_eq!(evaluate(&program, bindings).unwrap(), Value::from("big"));
    let bindings: Bindings = [("x", 1)].into_iter().collect();
    assert_eq!(evaluate(&program, bindings).unwrap(), Value::from("small"));
}

#[test]
fn test_later_binding_wins() {
    let mut arena = ExprArena::new();
    let root = arena.ident("v");
    let bindings = Bindings::new().with("v", 1).with("v", 2);
    assert_eq!(run_with(arena, root, bindings).unwrap(), Value::Int(2));
}
