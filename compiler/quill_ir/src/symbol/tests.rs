#![allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]

use super::*;
use proptest::prelude::*;
use rayon::prelude::*;
use std::collections::HashSet;

#[test]
fn test_intern_same_name_is_same_symbol() {
    let table = SymbolTable::new();
    let a = table.intern("x");
    let b = table.intern("x");
    assert!(a.ptr_eq(&b));
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "x");
}

#[test]
fn test_distinct_names_are_distinct() {
    let table = SymbolTable::new();
    let x = table.intern("x");
    let y = table.intern("y");
    assert_ne!(x, y);
    assert_eq!(table.len(), 2);
}

#[test]
fn test_dropped_symbol_is_collected() {
    let table = SymbolTable::new();
    let first = table.intern("temp");
    assert_eq!(table.live_count(), 1);
    drop(first);

    assert_eq!(table.live_count(), 0);
    assert_eq!(table.purge(), 1);
    assert!(table.is_empty());

    // A later intern mints a new but still unique instance.
    let again = table.intern("temp");
    let again2 = table.intern("temp");
    assert!(again.ptr_eq(&again2));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_dead_entry_is_overwritten_without_purge() {
    let table = SymbolTable::new();
    drop(table.intern("stale"));
    // Entry is still present but dead.
    assert_eq!(table.len(), 1);

    let fresh = table.intern("stale");
    assert_eq!(fresh.as_str(), "stale");
    assert_eq!(table.len(), 1);
    assert_eq!(table.live_count(), 1);
}

#[test]
fn test_symbols_work_as_hash_keys() {
    let table = SymbolTable::new();
    let mut set = HashSet::new();
    set.insert(table.intern("a"));
    set.insert(table.intern("a"));
    set.insert(table.intern("b"));
    assert_eq!(set.len(), 2);
    assert!(set.contains(&table.intern("a")));
}

#[test]
fn test_global_table_shared() {
    let a = Symbol::intern("global_table_shared");
    let b = SymbolTable::global().intern("global_table_shared");
    assert!(a.ptr_eq(&b));
}

#[test]
fn test_concurrent_interning_never_aliases() {
    let table = SymbolTable::new();
    let names: Vec<String> = (0..64).map(|i| format!("name{}", i % 8)).collect();

    let symbols: Vec<Symbol> = names.par_iter().map(|n| table.intern(n)).collect();

    for (name, symbol) in names.iter().zip(&symbols) {
        assert_eq!(symbol.as_str(), name);
        assert!(symbol.ptr_eq(&table.intern(name)));
    }
    assert_eq!(table.live_count(), 8);
}

#[test]
fn test_display_and_debug() {
    let table = SymbolTable::new();
    let s = table.intern("answer");
    assert_eq!(format!("{s}"), "answer");
    assert_eq!(format!("{s:?}"), "Symbol(\"answer\")");
}

proptest! {
    #[test]
    fn prop_intern_round_trips(name in "[a-zA-Z_][a-zA-Z0-9_]{0,16}") {
        let table = SymbolTable::new();
        let a = table.intern(&name);
        let b = table.intern(&name);
        prop_assert!(a.ptr_eq(&b));
        prop_assert_eq!(a.as_str(), name.as_str());
    }
}
