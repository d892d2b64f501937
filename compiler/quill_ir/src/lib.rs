//! Quill IR - symbols and expression trees
//!
//! This crate contains the data structures shared by every Quill front-end
//! and the evaluator:
//! - `Symbol` for interned identifiers, backed by a concurrent `SymbolTable`
//! - Expression nodes (`ExprKind`) and operators
//! - Arena allocation for expressions, addressed by `ExprId`
//! - Builder methods and a source printer on `ExprArena`
//!
//! # Design Philosophy
//!
//! - **Intern identifiers**: names compare by pointer, hash by a cached value
//! - **Flatten trees**: no `Box<Expr>`, children are `ExprId(u32)` indices
//! - **Share immutably**: a finished arena is wrapped in `SharedArena` so
//!   closures can outlive the program that created them

mod arena;
pub mod ast;
mod build;
mod expr_id;
mod printer;
mod symbol;

pub use arena::{ExprArena, Program, SharedArena};
pub use ast::{BinaryOp, ExprKind, Param, UnaryOp};
pub use expr_id::{ExprId, ExprRange, ParamRange};
pub use symbol::{Symbol, SymbolTable};
