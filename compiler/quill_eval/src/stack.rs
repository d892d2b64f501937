//! Native stack growth for the tree walker.
//!
//! Every node evaluation and every script call adds Rust frames, so a deeply
//! nested tree or a deeply recursive script can outrun the thread's stack.
//! Native builds wrap each node in [`ensure_sufficient_stack`], which moves
//! evaluation onto a fresh segment when the remaining space gets low.

/// Space that must remain before a node is evaluated on the current segment.
#[cfg(not(target_arch = "wasm32"))]
const STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each segment allocated once the red zone is reached.
#[cfg(not(target_arch = "wasm32"))]
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a new stack segment if fewer than
/// `STACK_RED_ZONE` bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, f)
}

/// The wasm stack cannot be grown from here; `EvalConfig::max_depth` keeps
/// script recursion within it instead.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
