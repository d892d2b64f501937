//! Arena storage for expression trees.
//!
//! - All nodes live in one contiguous `Vec`
//! - Child references are `ExprId` indices
//! - Child lists and parameter lists are ranges into side tables

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::ast::{ExprKind, Param};
use crate::{ExprId, ExprRange, ParamRange};

/// Contiguous storage for every node of one program.
#[derive(Clone, Default, PartialEq)]
pub struct ExprArena {
    /// All nodes (indexed by `ExprId`).
    exprs: Vec<ExprKind>,
    /// Flattened child lists (tuple elements, call args, block statements).
    expr_lists: Vec<ExprId>,
    /// Flattened closure parameter lists.
    params: Vec<Param>,
}

#[track_caller]
fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or_else(|_| panic!("expression arena exceeded {} entries", u32::MAX))
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node, returning its ID.
    ///
    /// # Panics
    /// Panics if the arena already holds `u32::MAX` nodes.
    #[inline]
    #[track_caller]
    pub fn alloc(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId::new(to_u32(self.exprs.len()));
        self.exprs.push(kind);
        id
    }

    /// Get a node by ID.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this arena.
    #[inline]
    #[track_caller]
    pub fn get(&self, id: ExprId) -> &ExprKind {
        &self.exprs[id.index()]
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Allocate a child list, returning its range.
    ///
    /// # Panics
    /// Panics if the flattened child lists would exceed `u32::MAX` entries.
    #[track_caller]
    pub fn alloc_list(&mut self, exprs: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = to_u32(self.expr_lists.len());
        self.expr_lists.extend(exprs);
        let len = to_u32(self.expr_lists.len()) - start;
        ExprRange::new(start, len)
    }

    /// Get a child list by range.
    ///
    /// # Panics
    /// Panics if `range` was not allocated by this arena.
    #[inline]
    #[track_caller]
    pub fn get_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Allocate a parameter list, returning its range.
    ///
    /// # Panics
    /// Panics if the flattened parameter lists would exceed `u32::MAX` entries.
    #[track_caller]
    pub fn alloc_params(&mut self, params: impl IntoIterator<Item = Param>) -> ParamRange {
        let start = to_u32(self.params.len());
        self.params.extend(params);
        let len = to_u32(self.params.len()) - start;
        ParamRange::new(start, len)
    }

    /// Get a parameter list by range.
    ///
    /// # Panics
    /// Panics if `range` was not allocated by this arena.
    #[inline]
    #[track_caller]
    pub fn get_params(&self, range: ParamRange) -> &[Param] {
        let start = range.start as usize;
        &self.params[start..start + range.len()]
    }
}

impl fmt::Debug for ExprArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprArena")
            .field("exprs", &self.exprs.len())
            .field("expr_lists", &self.expr_lists.len())
            .field("params", &self.params.len())
            .finish()
    }
}

/// Shared, immutable arena handle.
///
/// Closures keep the arena their body lives in, so a function created by one
/// program can be called from another.
#[derive(Clone, PartialEq)]
pub struct SharedArena(Arc<ExprArena>);

impl SharedArena {
    pub fn new(arena: ExprArena) -> Self {
        SharedArena(Arc::new(arena))
    }

    /// Whether both handles point at the same arena.
    #[inline]
    pub fn ptr_eq(&self, other: &SharedArena) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for SharedArena {
    type Target = ExprArena;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for SharedArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedArena({:?})", &*self.0)
    }
}

impl From<ExprArena> for SharedArena {
    fn from(arena: ExprArena) -> Self {
        SharedArena::new(arena)
    }
}

/// A complete program: an arena plus the root node to evaluate.
#[derive(Clone, Debug)]
pub struct Program {
    arena: SharedArena,
    root: ExprId,
}

impl Program {
    pub fn new(arena: impl Into<SharedArena>, root: ExprId) -> Self {
        Program {
            arena: arena.into(),
            root,
        }
    }

    #[inline]
    pub fn arena(&self) -> &SharedArena {
        &self.arena
    }

    #[inline]
    pub fn root(&self) -> ExprId {
        self.root
    }

    /// Source text of the whole program.
    pub fn to_source(&self) -> String {
        self.arena.display(self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    #[test]
    fn test_alloc_and_get() {
        let mut arena = ExprArena::new();
        let id = arena.alloc(ExprKind::Int(42));
        assert_eq!(arena.get(id), &ExprKind::Int(42));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_lists_and_params() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(ExprKind::Int(1));
        let b = arena.alloc(ExprKind::Int(2));
        let range = arena.alloc_list([a, b]);
        assert_eq!(arena.get_list(range), &[a, b]);

        let empty = arena.alloc_list(std::iter::empty());
        assert!(empty.is_empty());
        assert!(arena.get_list(empty).is_empty());

        let params = arena.alloc_params([Param::new(Symbol::intern("x"))]);
        assert_eq!(arena.get_params(params)[0].name.as_str(), "x");
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_get_rejects_foreign_id() {
        let mut other = ExprArena::new();
        other.alloc(ExprKind::Int(1));
        let foreign = other.alloc(ExprKind::Int(2));
        ExprArena::new().get(foreign);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_list_rejects_foreign_range() {
        let mut other = ExprArena::new();
        let a = other.alloc(ExprKind::Int(1));
        let foreign = other.alloc_list([a, a]);
        ExprArena::new().get_list(foreign);
    }

    #[test]
    fn test_shared_arena_ptr_eq() {
        let shared = SharedArena::new(ExprArena::new());
        let clone = shared.clone();
        assert!(shared.ptr_eq(&clone));
        assert!(!shared.ptr_eq(&SharedArena::new(ExprArena::new())));
    }
}
