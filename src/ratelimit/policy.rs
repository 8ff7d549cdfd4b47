//! Limit policies and their resolution from configuration.

use std::time::Duration;

use crate::config::{LimitRule, RateLimitingConfig};

/// Default sliding window when no policy is configured.
const DEFAULT_WINDOW: Duration = Duration::from_millis(60_000);
/// Default request cap when no policy is configured.
const DEFAULT_MAX_REQUESTS: u64 = 10;

/// The window and request cap applied to one rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPolicy {
    /// Duration of the sliding window
    pub window: Duration,
    /// Maximum requests allowed within the window
    pub max_requests: u64,
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            max_requests: DEFAULT_MAX_REQUESTS,
        }
    }
}

impl LimitPolicy {
    /// Create a policy from an explicit window and cap.
    pub fn new(window: Duration, max_requests: u64) -> Self {
        Self {
            window,
            max_requests,
        }
    }

    /// Resolve the policy for a route.
    ///
    /// A route-specific rule takes precedence over the section-wide
    /// window/cap settings.
    pub fn resolve(config: &RateLimitingConfig, route: &str) -> Self {
        match config.routes.get(route) {
            Some(rule) => rule.into(),
            None => Self {
                window: Duration::from_millis(config.window_ms),
                max_requests: config.max_requests,
            },
        }
    }
}

impl From<&LimitRule> for LimitPolicy {
    fn from(rule: &LimitRule) -> Self {
        Self {
            window: Duration::from_millis(rule.window_ms),
            max_requests: rule.max_requests,
        }
    }
}
