//! Clock abstraction for window timing.

use std::time::Instant;

/// Source of monotonic time for the rate limiter.
///
/// Injected so tests can drive window expiry without sleeping.
pub trait Clock: Send + Sync {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// System clock implementation using `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A manually advanced clock for tests.
///
/// Clones share the same offset, so a test can keep a handle
/// while the limiter owns another.
#[cfg(test)]
#[derive(Clone)]
pub(crate) struct ManualClock {
    base: Instant,
    offset: std::sync::Arc<parking_lot::Mutex<std::time::Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: std::sync::Arc::new(parking_lot::Mutex::new(std::time::Duration::ZERO)),
        }
    }

    pub(crate) fn advance(&self, by: std::time::Duration) {
        *self.offset.lock() += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock()
    }
}
