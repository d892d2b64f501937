//! Source printer for expression trees.
//!
//! `write_to` reproduces readable source for any node. The output is meant
//! for diagnostics (backtraces, error messages, debugging), so it favours
//! stable formatting over byte-exact round trips. Parentheses are inserted
//! only where operator precedence requires them.

use std::fmt::{self, Write};

use crate::ast::ExprKind;
use crate::{ExprArena, ExprId};

/// Binding strength of atoms, postfix and unary forms.
const PREC_ATOM: u8 = 0;
/// `label -> value`
const PREC_ASSOC: u8 = 15;
/// `a, b, c`
const PREC_TUPLE: u8 = 16;
/// Statement-like forms: `if`, `var`, assignment, `return`, ...
const PREC_STATEMENT: u8 = 17;

impl ExprArena {
    /// Write the source form of `id` into `out`.
    pub fn write_to(&self, id: ExprId, out: &mut impl Write) -> fmt::Result {
        Printer { arena: self, out }.expr(id)
    }

    /// Source form of `id` as a `String`.
    pub fn display(&self, id: ExprId) -> String {
        let mut buf = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(id, &mut buf);
        buf
    }
}

struct Printer<'a, W> {
    arena: &'a ExprArena,
    out: &'a mut W,
}

fn precedence(kind: &ExprKind) -> u8 {
    match kind {
        ExprKind::Binary { op, .. } => op.precedence(),
        ExprKind::Assoc { .. } => PREC_ASSOC,
        ExprKind::Tuple(_) => PREC_TUPLE,
        ExprKind::If { .. }
        | ExprKind::Let { .. }
        | ExprKind::Assign { .. }
        | ExprKind::Return(_)
        | ExprKind::Throw(_)
        | ExprKind::While { .. }
        | ExprKind::For { .. }
        | ExprKind::Try { .. }
        | ExprKind::Module { .. } => PREC_STATEMENT,
        _ => PREC_ATOM,
    }
}

impl<W: Write> Printer<'_, W> {
    fn expr(&mut self, id: ExprId) -> fmt::Result {
        if !id.is_valid() {
            return Ok(());
        }
        let arena = self.arena;
        match arena.get(id) {
            ExprKind::Null => self.out.write_str("null"),
            ExprKind::Bool(b) => write!(self.out, "{b}"),
            ExprKind::Int(n) => write!(self.out, "{n}"),
            ExprKind::Float(f) => write!(self.out, "{f:?}"),
            ExprKind::Str(s) => {
                self.out.write_char('"')?;
                self.escaped(s)?;
                self.out.write_char('"')
            }
            ExprKind::Interpolated(parts) => {
                self.out.write_char('"')?;
                for &part in arena.get_list(*parts) {
                    if let ExprKind::Str(s) = arena.get(part) {
                        self.escaped(s)?;
                    } else {
                        self.out.write_str("${")?;
                        self.expr(part)?;
                        self.out.write_char('}')?;
                    }
                }
                self.out.write_char('"')
            }
            ExprKind::Ident(name) => self.out.write_str(name.as_str()),
            ExprKind::Binary { op, left, right } => {
                let prec = op.precedence();
                self.operand(*left, prec)?;
                write!(self.out, " {} ", op.as_symbol())?;
                // Left-associative: an equal-precedence right operand needs parens.
                self.operand(*right, prec.saturating_sub(1))
            }
            ExprKind::Unary { op, operand } => {
                self.out.write_str(op.as_symbol())?;
                self.operand(*operand, PREC_ATOM)
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.out.write_str("if ")?;
                self.expr(*cond)?;
                self.out.write_str(" then ")?;
                self.expr(*then_branch)?;
                if else_branch.is_valid() {
                    self.out.write_str(" else ")?;
                    self.expr(*else_branch)?;
                }
                Ok(())
            }
            ExprKind::Tuple(elements) => {
                if elements.is_empty() {
                    return self.out.write_str("()");
                }
                self.comma_list(arena.get_list(*elements), PREC_ASSOC)
            }
            ExprKind::Assoc { label, value } => {
                self.operand(*label, PREC_ASSOC - 1)?;
                self.out.write_str(" -> ")?;
                self.operand(*value, PREC_ASSOC - 1)
            }
            ExprKind::List(inner) => {
                self.out.write_char('[')?;
                self.expr(*inner)?;
                self.out.write_char(']')
            }
            ExprKind::Index { target, key } => {
                self.operand(*target, PREC_ATOM)?;
                self.out.write_char('[')?;
                self.expr(*key)?;
                self.out.write_char(']')
            }
            ExprKind::Member { target, name } => {
                self.operand(*target, PREC_ATOM)?;
                write!(self.out, ".{name}")
            }
            ExprKind::Call { callee, args } => {
                self.operand(*callee, PREC_ATOM)?;
                self.out.write_char('(')?;
                self.comma_list(arena.get_list(*args), PREC_ASSOC)?;
                self.out.write_char(')')
            }
            ExprKind::Lambda { params, body } => {
                self.out.write_str("{ ")?;
                for (i, param) in arena.get_params(*params).iter().enumerate() {
                    if i > 0 {
                        self.out.write_str(", ")?;
                    }
                    if param.spread {
                        self.out.write_char('*')?;
                    }
                    self.out.write_str(param.name.as_str())?;
                }
                if !params.is_empty() {
                    self.out.write_char(' ')?;
                }
                self.out.write_str("-> ")?;
                self.expr(*body)?;
                self.out.write_str(" }")
            }
            ExprKind::Let {
                name,
                value,
                mutable,
            } => {
                let keyword = if *mutable { "var" } else { "val" };
                write!(self.out, "{keyword} {name} = ")?;
                self.expr(*value)
            }
            ExprKind::Assign { target, value } => {
                self.expr(*target)?;
                self.out.write_str(" = ")?;
                self.expr(*value)
            }
            ExprKind::Block(statements) => {
                let statements = arena.get_list(*statements);
                if statements.is_empty() {
                    return self.out.write_str("{ }");
                }
                self.out.write_str("{ ")?;
                for (i, &stmt) in statements.iter().enumerate() {
                    if i > 0 {
                        self.out.write_str("; ")?;
                    }
                    self.expr(stmt)?;
                }
                self.out.write_str(" }")
            }
            ExprKind::Return(value) => {
                self.out.write_str("return")?;
                if value.is_valid() {
                    self.out.write_char(' ')?;
                    self.expr(*value)?;
                }
                Ok(())
            }
            ExprKind::Break => self.out.write_str("break"),
            ExprKind::Continue => self.out.write_str("continue"),
            ExprKind::While { cond, body } => {
                self.out.write_str("while (")?;
                self.expr(*cond)?;
                self.out.write_str(") ")?;
                self.expr(*body)
            }
            ExprKind::For {
                binding,
                iter,
                body,
            } => {
                write!(self.out, "for ({binding} in ")?;
                self.expr(*iter)?;
                self.out.write_str(") ")?;
                self.expr(*body)
            }
            ExprKind::Throw(value) => {
                self.out.write_str("throw ")?;
                self.expr(*value)
            }
            ExprKind::Try {
                body,
                binding,
                handler,
            } => {
                self.out.write_str("try ")?;
                self.expr(*body)?;
                write!(self.out, " catch ({binding}) ")?;
                self.expr(*handler)
            }
            ExprKind::Module { name, body } => {
                self.out.write_str("module ")?;
                self.expr(*name)?;
                self.out.write_char(' ')?;
                self.expr(*body)
            }
            ExprKind::Text(text) => {
                self.out.write_str("text \"")?;
                self.escaped(text)?;
                self.out.write_char('"')
            }
            ExprKind::Emit(value) => {
                self.out.write_str("${")?;
                self.expr(*value)?;
                self.out.write_char('}')
            }
        }
    }

    /// Print `id`, parenthesized if it binds more loosely than `limit`.
    fn operand(&mut self, id: ExprId, limit: u8) -> fmt::Result {
        if id.is_valid() && precedence(self.arena.get(id)) > limit {
            self.out.write_char('(')?;
            self.expr(id)?;
            self.out.write_char(')')
        } else {
            self.expr(id)
        }
    }

    fn comma_list(&mut self, items: &[ExprId], limit: u8) -> fmt::Result {
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                self.out.write_str(", ")?;
            }
            self.operand(item, limit)?;
        }
        Ok(())
    }

    fn escaped(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            match c {
                '"' => self.out.write_str("\\\"")?,
                '\\' => self.out.write_str("\\\\")?,
                '\n' => self.out.write_str("\\n")?,
                '\t' => self.out.write_str("\\t")?,
                '$' => self.out.write_str("\\$")?,
                c => self.out.write_char(c)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
