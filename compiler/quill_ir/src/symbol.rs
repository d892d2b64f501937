//! Interned identifiers.
//!
//! A [`Symbol`] is a reference-counted handle to an interned name. Two symbols
//! for the same name are the *same allocation* for as long as either is
//! alive, so equality is a pointer compare and hashing reuses a hash computed
//! once at interning time.
//!
//! # Collection
//!
//! The table only holds [`Weak`] references. When the last `Symbol` for a name
//! is dropped the entry goes dead and is removed by the next purge; interning
//! the name again afterwards mints a fresh allocation. Uniqueness only has to
//! hold among *live* symbols, which is all that scope lookups ever compare.
//!
//! # Thread Safety
//!
//! The table is a sharded concurrent map (`DashMap`), so interning from
//! several evaluation contexts at once only contends on the shard that owns
//! the name.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Weak};

use dashmap::DashMap;
use rustc_hash::{FxBuildHasher, FxHasher};

/// Number of fresh insertions between automatic purges of dead entries.
const PURGE_INTERVAL: usize = 4096;

static GLOBAL: LazyLock<SymbolTable> = LazyLock::new(SymbolTable::new);

struct SymbolData {
    name: Box<str>,
    hash: u64,
}

/// Interned identifier token.
#[derive(Clone)]
pub struct Symbol(Arc<SymbolData>);

impl Symbol {
    /// Intern `name` in the process-wide table.
    #[inline]
    pub fn intern(name: &str) -> Self {
        SymbolTable::global().intern(name)
    }

    /// The interned name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0.name
    }

    /// Whether both handles point at the same interned allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Symbol) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Symbol {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concurrent weak-value interning table.
pub struct SymbolTable {
    map: DashMap<Box<str>, Weak<SymbolData>, FxBuildHasher>,
    inserts_since_purge: AtomicUsize,
}

impl SymbolTable {
    /// Create an empty table.
    ///
    /// Most callers want [`SymbolTable::global`]; private tables are useful in
    /// tests that count entries.
    pub fn new() -> Self {
        SymbolTable {
            map: DashMap::with_hasher(FxBuildHasher),
            inserts_since_purge: AtomicUsize::new(0),
        }
    }

    /// The process-wide table used by [`Symbol::intern`].
    pub fn global() -> &'static SymbolTable {
        &GLOBAL
    }

    /// Intern `name`, returning the live symbol for it if one exists.
    pub fn intern(&self, name: &str) -> Symbol {
        // Fast path: shard read lock only. The guard is consumed inside
        // `and_then`, so no lock is held past this statement.
        let live = self.map.get(name).and_then(|weak| weak.upgrade());
        if let Some(data) = live {
            return Symbol(data);
        }

        let symbol = {
            let mut slot = self.map.entry(Box::from(name)).or_default();
            // The entry may have been filled by a racing intern, or it may be
            // a dead weak that was never purged. Only a successful upgrade is
            // trusted; anything else is overwritten.
            if let Some(data) = slot.upgrade() {
                return Symbol(data);
            }
            let data = Arc::new(SymbolData {
                name: Box::from(name),
                hash: hash_name(name),
            });
            *slot = Arc::downgrade(&data);
            Symbol(data)
        };

        let inserted = self.inserts_since_purge.fetch_add(1, Ordering::Relaxed);
        if inserted >= PURGE_INTERVAL {
            self.purge();
        }
        symbol
    }

    /// Remove entries whose symbols have all been dropped.
    ///
    /// Returns the number of entries removed.
    pub fn purge(&self) -> usize {
        self.inserts_since_purge.store(0, Ordering::Relaxed);
        let before = self.map.len();
        self.map.retain(|_, weak| weak.strong_count() > 0);
        let removed = before.saturating_sub(self.map.len());
        if removed > 0 {
            tracing::debug!(removed, remaining = self.map.len(), "purged dead symbols");
        }
        removed
    }

    /// Number of entries, including dead ones not yet purged.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the table has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of names with at least one live symbol.
    pub fn live_count(&self) -> usize {
        self.map
            .iter()
            .filter(|entry| entry.value().strong_count() > 0)
            .count()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_name(name: &str) -> u64 {
    let mut hasher = FxHasher::default();
    name.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests;
