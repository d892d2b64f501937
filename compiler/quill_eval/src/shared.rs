//! Handle to a host registry shared by many executions.
//!
//! Registries are built once and never change afterwards, so contexts hold a
//! cheap clone instead of their own copy.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, LazyLock};

use crate::host::HostRegistry;

static BUILTINS: LazyLock<SharedRegistry> =
    LazyLock::new(|| SharedRegistry::new(HostRegistry::with_builtins()));

/// Read-only, clonable handle to a finished registry.
pub struct SharedRegistry<T = HostRegistry>(Arc<T>);

impl<T> SharedRegistry<T> {
    pub fn new(registry: T) -> Self {
        SharedRegistry(Arc::new(registry))
    }

    /// Whether both handles point at the same registry.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl SharedRegistry {
    /// The process-wide registry holding only the `String`, `List` and `Map`
    /// methods. Contexts built without an explicit registry use it.
    pub fn builtins() -> Self {
        BUILTINS.clone()
    }
}

impl<T> Clone for SharedRegistry<T> {
    fn clone(&self) -> Self {
        SharedRegistry(Arc::clone(&self.0))
    }
}

impl<T> Deref for SharedRegistry<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedRegistry").field(&*self.0).finish()
    }
}

impl<T> From<T> for SharedRegistry<T> {
    fn from(registry: T) -> Self {
        SharedRegistry::new(registry)
    }
}
