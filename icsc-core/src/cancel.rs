//! Receive loop cancellation
//!
//! Built on `portable-atomic` so the flag also works on cores without
//! native compare-and-swap (thumbv6m), where the final binary supplies a
//! `critical-section` implementation.

use portable_atomic::{AtomicBool, Ordering};
use portable_atomic_util::Arc;

/// Shared stop flag for [`Station::run`](crate::Station::run)
///
/// Clones share the flag. Cancelling is sticky and may happen from any
/// thread or interrupt; the loop notices it before its next read cycle.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Ask the loop to stop
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Check if the loop has been asked to stop
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
