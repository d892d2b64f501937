//! Expression tree node definitions.

mod expr;
mod operators;

pub use expr::{ExprKind, Param};
pub use operators::{BinaryOp, UnaryOp};
