//! Cooperative cancellation for background simulation tasks.

use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag shared between the simulator and its
/// background stepping task.
///
/// Each play session owns exactly one token. Cancellation is checked at
/// step boundaries, never mid-step, so a transition already in flight
/// across its row partitions always completes before the task stops.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    /// Creates a live (non-cancelled) token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_sticky() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());

        token.cancel();
        assert!(token.is_cancelled());

        token.cancel();
        assert!(token.is_cancelled());
    }
}
