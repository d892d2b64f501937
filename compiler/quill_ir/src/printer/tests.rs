use pretty_assertions::assert_eq;

use crate::ast::{BinaryOp, Param, UnaryOp};
use crate::{ExprArena, Program, Symbol};

#[test]
fn literals() {
    let mut arena = ExprArena::new();
    let null = arena.null();
    let t = arena.bool(true);
    let n = arena.int(-7);
    let f = arena.float(2.0);
    let s = arena.str("say \"hi\"\n$x");
    assert_eq!(arena.display(null), "null");
    assert_eq!(arena.display(t), "true");
    assert_eq!(arena.display(n), "-7");
    assert_eq!(arena.display(f), "2.0");
    assert_eq!(arena.display(s), r#""say \"hi\"\n\$x""#);
}

#[test]
fn binary_precedence() {
    let mut arena = ExprArena::new();
    let a = arena.ident("a");
    let b = arena.ident("b");
    let c = arena.ident("c");
    let sum = arena.binary(BinaryOp::Add, a, b);
    let product = arena.binary(BinaryOp::Mul, sum, c);
    assert_eq!(arena.display(product), "(a + b) * c");

    let times = arena.binary(BinaryOp::Mul, a, b);
    let plus = arena.binary(BinaryOp::Add, times, c);
    assert_eq!(arena.display(plus), "a * b + c");
}

#[test]
fn left_associative_right_operand() {
    let mut arena = ExprArena::new();
    let a = arena.ident("a");
    let b = arena.ident("b");
    let c = arena.ident("c");
    let inner = arena.binary(BinaryOp::Sub, b, c);
    let outer = arena.binary(BinaryOp::Sub, a, inner);
    assert_eq!(arena.display(outer), "a - (b - c)");

    let left = arena.binary(BinaryOp::Sub, a, b);
    let chain = arena.binary(BinaryOp::Sub, left, c);
    assert_eq!(arena.display(chain), "a - b - c");
}

#[test]
fn unary_wraps_binary_operand() {
    let mut arena = ExprArena::new();
    let a = arena.ident("a");
    let b = arena.ident("b");
    let and = arena.binary(BinaryOp::And, a, b);
    let not = arena.unary(UnaryOp::Not, and);
    assert_eq!(arena.display(not), "!(a && b)");
}

#[test]
fn collections() {
    let mut arena = ExprArena::new();
    let one = arena.int(1);
    let two = arena.int(2);
    let list = arena.list_of([one, two]);
    assert_eq!(arena.display(list), "[1, 2]");

    let empty = arena.list_of([]);
    assert_eq!(arena.display(empty), "[]");

    let key = arena.str("k");
    let pair = arena.assoc(key, one);
    let map = arena.list_of([pair]);
    assert_eq!(arena.display(map), r#"["k" -> 1]"#);

    let idx = arena.index(list, one);
    assert_eq!(arena.display(idx), "[1, 2][1]");
}

#[test]
fn calls_and_lambdas() {
    let mut arena = ExprArena::new();
    let x = arena.ident("x");
    let one = arena.int(1);
    let body = arena.binary(BinaryOp::Add, x, one);
    let lambda = arena.lambda_named(&["x"], body);
    assert_eq!(arena.display(lambda), "{ x -> x + 1 }");

    let rest_body = arena.ident("rest");
    let spread = arena.lambda(
        [Param::new(Symbol::intern("a")), Param::spread(Symbol::intern("rest"))],
        rest_body,
    );
    assert_eq!(arena.display(spread), "{ a, *rest -> rest }");

    let f = arena.ident("f");
    let five = arena.int(5);
    let call = arena.call(f, [five, x]);
    assert_eq!(arena.display(call), "f(5, x)");

    let obj = arena.ident("obj");
    let member = arena.member(obj, "size");
    let method = arena.call(member, []);
    assert_eq!(arena.display(method), "obj.size()");
}

#[test]
fn statements() {
    let mut arena = ExprArena::new();
    let one = arena.int(1);
    let decl = arena.let_var("x", one);
    let x = arena.ident("x");
    let two = arena.int(2);
    let assign = arena.assign(x, two);
    let cond = arena.binary(BinaryOp::Lt, x, two);
    let brk = arena.break_();
    let lp = arena.while_loop(cond, brk);
    let block = arena.block([decl, assign, lp]);
    assert_eq!(
        arena.display(block),
        "{ var x = 1; x = 2; while (x < 2) break }"
    );

    let ret = arena.ret(x);
    let cond2 = arena.bool(false);
    let branch = arena.if_else(cond2, ret, one);
    assert_eq!(arena.display(branch), "if false then return x else 1");

    let msg = arena.str("boom");
    let throw = arena.throw(msg);
    let e = arena.ident("e");
    let attempt = arena.try_catch(throw, "e", e);
    assert_eq!(arena.display(attempt), r#"try throw "boom" catch (e) e"#);

    let items = arena.ident("items");
    let each = arena.for_in("item", items, x);
    assert_eq!(arena.display(each), "for (item in items) x");
}

#[test]
fn templates_and_modules() {
    let mut arena = ExprArena::new();
    let hello = arena.str("Hello ");
    let name = arena.ident("name");
    let greeting = arena.interpolated([hello, name]);
    assert_eq!(arena.display(greeting), r#""Hello ${name}""#);

    let text = arena.text("a\tb");
    assert_eq!(arena.display(text), r#"text "a\tb""#);
    let emit = arena.emit(name);
    assert_eq!(arena.display(emit), "${name}");

    let module_name = arena.str("util");
    let body = arena.block([]);
    let module = arena.module(module_name, body);
    assert_eq!(arena.display(module), r#"module "util" { }"#);
}

#[test]
fn program_to_source() {
    let mut arena = ExprArena::new();
    let a = arena.int(1);
    let b = arena.int(2);
    let root = arena.binary(BinaryOp::Eq, a, b);
    let program = Program::new(arena, root);
    assert_eq!(program.to_source(), "1 == 2");
}
