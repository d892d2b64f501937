//! Tree-walking evaluation.
//!
//! Evaluation logic is organized by category:
//!
//! - `operators`: binary and unary operators
//! - `collections`: tuple/list/map construction, indexing, iteration
//! - `member`: member access for reading, calling and assignment
//! - `call`: closure, host function and host method invocation
//! - `control`: loops, `try/catch`, assignment
//! - `module`: module declarations
//!
//! Every node evaluates to a [`FlowResult`]; `flow!` forwards signals and
//! errors from children.

mod call;
mod collections;
mod control;
mod member;
mod module;
mod operators;

use std::sync::Arc;

use quill_ir::{BinaryOp, ExprId, ExprKind, ExprRange};

use crate::completion::{flow, Completion, FlowResult};
use crate::context::EvalContext;
use crate::errors::EvalError;
use crate::function::{Closure, FunctionValue};
use crate::scope::Scope;
use crate::stack::ensure_sufficient_stack;
use crate::Value;

impl EvalContext<'_> {
    /// Evaluate a node, attaching a stack snapshot to any error that does
    /// not carry one yet.
    pub(crate) fn exec(&mut self, id: ExprId) -> FlowResult {
        ensure_sufficient_stack(|| self.exec_node(id)).map_err(|err| self.annotate(err, id))
    }

    fn exec_node(&mut self, id: ExprId) -> FlowResult {
        let arena = self.arena.clone();
        let value = match arena.get(id) {
            ExprKind::Null => Value::Null,
            ExprKind::Bool(b) => Value::Bool(*b),
            ExprKind::Int(n) => Value::Int(*n),
            ExprKind::Float(x) => Value::Float(*x),
            ExprKind::Str(s) => Value::Str(Arc::clone(s)),
            ExprKind::Interpolated(parts) => flow!(self.exec_interpolated(*parts)),
            ExprKind::Ident(name) => self.scope.get(name)?,

            ExprKind::Binary { op, left, right } => {
                let left_value = flow!(self.exec(*left));
                match op {
                    BinaryOp::And => Value::Bool(
                        left_value.is_truthy() && flow!(self.exec(*right)).is_truthy(),
                    ),
                    BinaryOp::Or => Value::Bool(
                        left_value.is_truthy() || flow!(self.exec(*right)).is_truthy(),
                    ),
                    BinaryOp::Coalesce if left_value.is_null() => flow!(self.exec(*right)),
                    BinaryOp::Coalesce => left_value,
                    _ => {
                        let right_value = flow!(self.exec(*right));
                        operators::evaluate_binary(&left_value, &right_value, *op)?
                    }
                }
            }
            ExprKind::Unary { op, operand } => {
                let value = flow!(self.exec(*operand));
                operators::evaluate_unary(&value, *op)?
            }

            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if flow!(self.exec(*cond)).is_truthy() {
                    return self.exec(*then_branch);
                }
                match else_branch.valid() {
                    Some(branch) => return self.exec(branch),
                    None => Value::Null,
                }
            }

            ExprKind::Tuple(elements) => flow!(self.exec_tuple(*elements)),
            ExprKind::Assoc { label, value } => {
                let label = flow!(self.exec(*label));
                let value = flow!(self.exec(*value));
                Value::assoc(label, value)
            }
            ExprKind::List(inner) => flow!(self.exec_list(*inner)),
            ExprKind::Index { target, key } => flow!(self.exec_index_ref(*target, *key)).get()?,
            ExprKind::Member { target, name } => {
                let target = flow!(self.exec(*target));
                self.member_value(&target, name)?
            }

            ExprKind::Call { callee, args } => return self.exec_call(id, *callee, *args),
            ExprKind::Lambda { params, body } => Value::Function(FunctionValue::Closure(
                Arc::new(Closure {
                    name: None,
                    params: *params,
                    body: *body,
                    arena: self.arena.clone(),
                    scope: self.scope.clone(),
                }),
            )),

            ExprKind::Let {
                name,
                value,
                mutable,
            } => {
                let value = match arena.get(*value) {
                    // A lambda declared directly takes the declaration's name.
                    ExprKind::Lambda { params, body } => {
                        Value::Function(FunctionValue::Closure(Arc::new(Closure {
                            name: Some(name.clone()),
                            params: *params,
                            body: *body,
                            arena: self.arena.clone(),
                            scope: self.scope.clone(),
                        })))
                    }
                    _ => flow!(self.exec(*value)),
                };
                if *mutable {
                    self.scope.def(name.clone(), value.clone())?;
                } else {
                    self.scope.val(name.clone(), value.clone())?;
                }
                value
            }
            ExprKind::Assign { target, value } => {
                let value = flow!(self.exec(*value));
                flow!(self.assign(*target, value.clone()));
                value
            }

            ExprKind::Block(statements) => {
                let mut last = Value::Null;
                for &statement in arena.get_list(*statements) {
                    last = flow!(self.exec(statement));
                }
                last
            }
            ExprKind::Return(value) => {
                let value = match value.valid() {
                    Some(value) => flow!(self.exec(value)),
                    None => Value::Null,
                };
                return Ok(Completion::Returned(value));
            }
            ExprKind::Break => return Ok(Completion::Broke),
            ExprKind::Continue => return Ok(Completion::Continued),
            ExprKind::While { cond, body } => return self.exec_while(*cond, *body),
            ExprKind::For {
                binding,
                iter,
                body,
            } => return self.exec_for(binding, *iter, *body),
            ExprKind::Throw(value) => {
                let value = flow!(self.exec(*value));
                return Err(EvalError::thrown(value));
            }
            ExprKind::Try {
                body,
                binding,
                handler,
            } => return self.exec_try(*body, binding, *handler),

            ExprKind::Module { name, body } => return self.exec_module(*name, *body),
            ExprKind::Text(text) => {
                self.output.write_str(text)?;
                Value::Null
            }
            ExprKind::Emit(value) => {
                let value = flow!(self.exec(*value));
                if !value.is_null() {
                    self.output.write_str(&value.to_string())?;
                }
                Value::Null
            }
        };
        Ok(Completion::Completed(value))
    }

    /// Concatenate the display forms of every part.
    fn exec_interpolated(&mut self, parts: ExprRange) -> FlowResult {
        let arena = self.arena.clone();
        let mut text = String::new();
        for &part in arena.get_list(parts) {
            let value = flow!(self.exec(part));
            text.push_str(&value.to_string());
        }
        Ok(Completion::Completed(Value::from(text)))
    }

    /// Evaluate a list of expressions, left to right.
    fn exec_all(&mut self, range: ExprRange) -> FlowResult<Vec<Value>> {
        let arena = self.arena.clone();
        let ids = arena.get_list(range);
        let mut values = Vec::with_capacity(ids.len());
        for &id in ids {
            values.push(flow!(self.exec(id)));
        }
        Ok(Completion::Completed(values))
    }
}

