//! Node constructors for hosts that assemble trees directly.
//!
//! Parsing is someone else's job; these helpers are what a front-end (or a
//! test) calls to lay nodes out in an [`ExprArena`].

use std::sync::Arc;

use crate::ast::{BinaryOp, ExprKind, Param, UnaryOp};
use crate::{ExprArena, ExprId, Symbol};

impl ExprArena {
    pub fn null(&mut self) -> ExprId {
        self.alloc(ExprKind::Null)
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.alloc(ExprKind::Bool(value))
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.alloc(ExprKind::Int(value))
    }

    pub fn float(&mut self, value: f64) -> ExprId {
        self.alloc(ExprKind::Float(value))
    }

    pub fn str(&mut self, value: &str) -> ExprId {
        self.alloc(ExprKind::Str(Arc::from(value)))
    }

    pub fn interpolated(&mut self, parts: impl IntoIterator<Item = ExprId>) -> ExprId {
        let parts = self.alloc_list(parts);
        self.alloc(ExprKind::Interpolated(parts))
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        self.alloc(ExprKind::Ident(Symbol::intern(name)))
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.alloc(ExprKind::Binary { op, left, right })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.alloc(ExprKind::Unary { op, operand })
    }

    pub fn if_else(&mut self, cond: ExprId, then_branch: ExprId, else_branch: ExprId) -> ExprId {
        self.alloc(ExprKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    pub fn if_then(&mut self, cond: ExprId, then_branch: ExprId) -> ExprId {
        self.if_else(cond, then_branch, ExprId::INVALID)
    }

    pub fn tuple(&mut self, elements: impl IntoIterator<Item = ExprId>) -> ExprId {
        let elements = self.alloc_list(elements);
        self.alloc(ExprKind::Tuple(elements))
    }

    pub fn assoc(&mut self, label: ExprId, value: ExprId) -> ExprId {
        self.alloc(ExprKind::Assoc { label, value })
    }

    /// `[inner]`
    pub fn list(&mut self, inner: ExprId) -> ExprId {
        self.alloc(ExprKind::List(inner))
    }

    /// `[a, b, c]`: a list around a tuple of the elements (or `[]`).
    pub fn list_of(&mut self, elements: impl IntoIterator<Item = ExprId>) -> ExprId {
        let elements: Vec<ExprId> = elements.into_iter().collect();
        let inner = match elements.as_slice() {
            [] => ExprId::INVALID,
            [single] => *single,
            _ => self.tuple(elements),
        };
        self.list(inner)
    }

    pub fn index(&mut self, target: ExprId, key: ExprId) -> ExprId {
        self.alloc(ExprKind::Index { target, key })
    }

    pub fn member(&mut self, target: ExprId, name: &str) -> ExprId {
        self.alloc(ExprKind::Member {
            target,
            name: Symbol::intern(name),
        })
    }

    pub fn call(&mut self, callee: ExprId, args: impl IntoIterator<Item = ExprId>) -> ExprId {
        let args = self.alloc_list(args);
        self.alloc(ExprKind::Call { callee, args })
    }

    pub fn lambda(&mut self, params: impl IntoIterator<Item = Param>, body: ExprId) -> ExprId {
        let params = self.alloc_params(params);
        self.alloc(ExprKind::Lambda { params, body })
    }

    /// `{ a, b -> body }` with plain positional parameters.
    pub fn lambda_named(&mut self, params: &[&str], body: ExprId) -> ExprId {
        self.lambda(params.iter().map(|p| Param::new(Symbol::intern(p))), body)
    }

    pub fn let_var(&mut self, name: &str, value: ExprId) -> ExprId {
        self.alloc(ExprKind::Let {
            name: Symbol::intern(name),
            value,
            mutable: true,
        })
    }

    pub fn let_val(&mut self, name: &str, value: ExprId) -> ExprId {
        self.alloc(ExprKind::Let {
            name: Symbol::intern(name),
            value,
            mutable: false,
        })
    }

    pub fn assign(&mut self, target: ExprId, value: ExprId) -> ExprId {
        self.alloc(ExprKind::Assign { target, value })
    }

    pub fn block(&mut self, statements: impl IntoIterator<Item = ExprId>) -> ExprId {
        let statements = self.alloc_list(statements);
        self.alloc(ExprKind::Block(statements))
    }

    pub fn ret(&mut self, value: ExprId) -> ExprId {
        self.alloc(ExprKind::Return(value))
    }

    pub fn break_(&mut self) -> ExprId {
        self.alloc(ExprKind::Break)
    }

    pub fn continue_(&mut self) -> ExprId {
        self.alloc(ExprKind::Continue)
    }

    pub fn while_loop(&mut self, cond: ExprId, body: ExprId) -> ExprId {
        self.alloc(ExprKind::While { cond, body })
    }

    pub fn for_in(&mut self, binding: &str, iter: ExprId, body: ExprId) -> ExprId {
        self.alloc(ExprKind::For {
            binding: Symbol::intern(binding),
            iter,
            body,
        })
    }

    pub fn throw(&mut self, value: ExprId) -> ExprId {
        self.alloc(ExprKind::Throw(value))
    }

    pub fn try_catch(&mut self, body: ExprId, binding: &str, handler: ExprId) -> ExprId {
        self.alloc(ExprKind::Try {
            body,
            binding: Symbol::intern(binding),
            handler,
        })
    }

    pub fn module(&mut self, name: ExprId, body: ExprId) -> ExprId {
        self.alloc(ExprKind::Module { name, body })
    }

    pub fn text(&mut self, text: &str) -> ExprId {
        self.alloc(ExprKind::Text(Arc::from(text)))
    }

    pub fn emit(&mut self, value: ExprId) -> ExprId {
        self.alloc(ExprKind::Emit(value))
    }
}
