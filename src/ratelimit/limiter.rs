//! Core rate limiter implementation.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, trace};

use super::clock::{Clock, SystemClock};
use super::policy::LimitPolicy;

/// Default entry count above which expired entries are swept.
const DEFAULT_SWEEP_THRESHOLD: usize = 1000;

/// State tracked for one throttled identifier.
#[derive(Debug, Clone)]
struct RateLimitEntry {
    /// Requests observed in the current window
    count: u64,
    /// When the current window began
    window_start: Instant,
}

/// Read-only snapshot of an identifier's quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaInfo {
    /// Requests left before the identifier is blocked
    pub remaining: u64,
    /// Time until the current window resets; zero when no window is open
    pub reset_in: Duration,
}

/// The core rate limiter that tracks per-identifier request counts.
///
/// Windows are hard-reset: once a window elapses the next request starts
/// a fresh one, so a burst at the tail of one window followed by a burst
/// at the head of the next is allowed. This struct is thread-safe and can
/// be shared across tasks behind an `Arc`.
pub struct RateLimiter<C: Clock = SystemClock> {
    /// Rate limit entries indexed by identifier
    entries: RwLock<HashMap<String, RateLimitEntry>>,
    /// Entry count above which expired entries are swept during `check`
    sweep_threshold: usize,
    /// Time source for window bookkeeping
    clock: C,
}

impl RateLimiter<SystemClock> {
    /// Create a new rate limiter with the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Create a new rate limiter with a custom sweep threshold.
    pub fn with_sweep_threshold(sweep_threshold: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            sweep_threshold,
            clock: SystemClock,
        }
    }
}

impl Default for RateLimiter<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> RateLimiter<C> {
    /// Create a new rate limiter with the given time source.
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            sweep_threshold: DEFAULT_SWEEP_THRESHOLD,
            clock,
        }
    }

    /// Record a request for `identifier` and decide whether it is blocked.
    ///
    /// Returns `true` when the identifier has exceeded `policy.max_requests`
    /// within the current window. Never fails; unknown identifiers simply
    /// open a fresh window.
    pub fn check(&self, identifier: &str, policy: &LimitPolicy) -> bool {
        let now = self.clock.now();
        let mut entries = self.entries.write();

        if entries.len() > self.sweep_threshold {
            let before = entries.len();
            entries.retain(|_, entry| now.duration_since(entry.window_start) <= policy.window);
            debug!(
                swept = before - entries.len(),
                tracked = entries.len(),
                "Swept expired rate limit entries"
            );
        }

        match entries.entry(identifier.to_string()) {
            Entry::Vacant(slot) => {
                trace!(identifier, "Opening rate limit window");
                slot.insert(RateLimitEntry {
                    count: 1,
                    window_start: now,
                });
                false
            }
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();
                if now.duration_since(entry.window_start) > policy.window {
                    // Window elapsed: hard reset rather than a rolling log
                    entry.count = 1;
                    entry.window_start = now;
                    false
                } else {
                    entry.count += 1;
                    let blocked = entry.count > policy.max_requests;
                    if blocked {
                        debug!(
                            identifier,
                            count = entry.count,
                            limit = policy.max_requests,
                            "Rate limit exceeded"
                        );
                    }
                    blocked
                }
            }
        }
    }

    /// Inspect the quota for `identifier` without recording a request.
    ///
    /// Never mutates state or creates entries. An unknown identifier, or
    /// one whose window has already elapsed, reports a full quota with a
    /// zero reset time.
    pub fn info(&self, identifier: &str, policy: &LimitPolicy) -> QuotaInfo {
        let now = self.clock.now();
        let entries = self.entries.read();

        match entries.get(identifier) {
            Some(entry) => {
                let elapsed = now.duration_since(entry.window_start);
                if elapsed > policy.window {
                    QuotaInfo {
                        remaining: policy.max_requests,
                        reset_in: Duration::ZERO,
                    }
                } else {
                    QuotaInfo {
                        remaining: policy.max_requests.saturating_sub(entry.count),
                        reset_in: policy.window - elapsed,
                    }
                }
            }
            None => QuotaInfo {
                remaining: policy.max_requests,
                reset_in: Duration::ZERO,
            },
        }
    }

    /// Get the number of tracked identifiers.
    pub fn entry_count(&self) -> usize {
        let entries = self.entries.read();
        entries.len()
    }

    /// Clear all entries.
    ///
    /// This is primarily useful for testing.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.clear();
    }
}
