//! Cooperative cancellation.
//!
//! The host keeps a clone of the handle and raises it from any thread; the
//! evaluator polls it at every call, loop iteration and host dispatch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::{interrupted, EvalResult};

#[derive(Clone, Debug, Default)]
pub struct InterruptHandle(Arc<AtomicBool>);

impl InterruptHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }

    #[inline]
    pub fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// `Err(Interrupted)` once the handle has been raised.
    #[inline]
    pub fn check(&self) -> EvalResult<()> {
        if self.is_interrupted() {
            Err(interrupted())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EvalErrorKind;

    #[test]
    fn test_clones_share_the_flag() {
        let handle = InterruptHandle::new();
        let remote = handle.clone();
        assert!(handle.check().is_ok());
        remote.interrupt();
        assert!(handle.is_interrupted());
        assert!(matches!(
            handle.check().map_err(|e| e.kind),
            Err(EvalErrorKind::Interrupted)
        ));
        handle.reset();
        assert!(remote.check().is_ok());
    }
}
