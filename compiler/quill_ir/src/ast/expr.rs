//! Expression node kinds.
//!
//! All children are [`ExprId`] indices into the owning arena. Optional
//! children use [`ExprId::INVALID`].

use std::sync::Arc;

use super::operators::{BinaryOp, UnaryOp};
use crate::{ExprId, ExprRange, ParamRange, Symbol};

/// Expression variants.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// `null`
    Null,

    /// `true`, `false`
    Bool(bool),

    /// Integer literal: `42`
    Int(i64),

    /// Float literal: `2.5`
    Float(f64),

    /// String literal: `"text"`
    Str(Arc<str>),

    /// Interpolated string: `"Hello ${name}!"`
    ///
    /// String-literal parts are written verbatim, other parts as `${...}`.
    Interpolated(ExprRange),

    /// Variable reference
    Ident(Symbol),

    /// Binary operation: `left op right`
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },

    /// Unary operation: `op operand`
    Unary { op: UnaryOp, operand: ExprId },

    /// Conditional: `if cond then a else b`
    If {
        cond: ExprId,
        then_branch: ExprId,
        /// `ExprId::INVALID` = no else branch (yields null).
        else_branch: ExprId,
    },

    /// Comma sequence: `a, b, c`
    Tuple(ExprRange),

    /// Labelled value: `label -> value`
    Assoc { label: ExprId, value: ExprId },

    /// List construction: `[inner]`; `ExprId::INVALID` = `[]`.
    List(ExprId),

    /// Index access: `target[key]`
    Index { target: ExprId, key: ExprId },

    /// Member access: `target.name`
    Member { target: ExprId, name: Symbol },

    /// Call: `callee(args...)`
    Call { callee: ExprId, args: ExprRange },

    /// Closure literal: `{ a, b -> body }`
    Lambda { params: ParamRange, body: ExprId },

    /// Declaration: `var name = value` (mutable) or `val name = value`.
    Let {
        name: Symbol,
        value: ExprId,
        mutable: bool,
    },

    /// Assignment: `target = value`
    ///
    /// The target may be an identifier, index, member, or a tuple of those
    /// (destructuring).
    Assign { target: ExprId, value: ExprId },

    /// Statement block: `{ a; b; c }`. The last statement's value is the
    /// block's value. Blocks do not open a scope.
    Block(ExprRange),

    /// `return` / `return value`
    Return(ExprId),

    /// `break`
    Break,

    /// `continue`
    Continue,

    /// `while (cond) body`
    While { cond: ExprId, body: ExprId },

    /// `for (binding in iter) body`
    For {
        binding: Symbol,
        iter: ExprId,
        body: ExprId,
    },

    /// `throw value`
    Throw(ExprId),

    /// `try body catch (binding) handler`
    Try {
        body: ExprId,
        binding: Symbol,
        handler: ExprId,
    },

    /// `module "name" body`
    Module { name: ExprId, body: ExprId },

    /// Literal template text written to the output sink.
    Text(Arc<str>),

    /// Template expression `${expr}` whose display form is written to the
    /// output sink.
    Emit(ExprId),
}

/// A closure parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: Symbol,
    /// Trailing spread parameter (`*rest`) receiving the remaining arguments
    /// as a list.
    pub spread: bool,
}

impl Param {
    pub fn new(name: Symbol) -> Self {
        Param {
            name,
            spread: false,
        }
    }

    pub fn spread(name: Symbol) -> Self {
        Param { name, spread: true }
    }
}
