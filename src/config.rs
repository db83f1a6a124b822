//! # Dispatch configuration.
//!
//! Provides [`Config`] centralized settings for an [`AsyncBridge`](crate::AsyncBridge).
//!
//! ## Sentinel values
//! - `attempt_timeout = 0s` → no per-attempt timeout
//! - `bus_capacity = 0` → clamped to 1
//! - `retry.max_attempts = 0` → clamped to 1

use std::time::Duration;

use crate::policies::RetryPolicy;

/// Configuration for asynchronous dispatch.
///
/// ## Field semantics
/// - `retry`: attempt budget and fixed delay, applied to every destination independently
/// - `attempt_timeout`: upper bound for a single `deliver` call (`0s` = none)
/// - `bus_capacity`: lifecycle event ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Retry policy applied per destination.
    pub retry: RetryPolicy,

    /// Per-attempt timeout.
    ///
    /// - `Duration::ZERO` = the attempt runs until the destination returns
    /// - `> 0` = the attempt is cancelled and counted as a retryable
    ///   [`DeliveryError::Timeout`](crate::DeliveryError::Timeout)
    pub attempt_timeout: Duration,

    /// Capacity of the lifecycle event bus.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` events skip older items.
    pub bus_capacity: usize,
}

impl Config {
    /// Convenience constructor overriding only the retry policy.
    pub fn with_retry(max_attempts: u32, wait_between: Duration) -> Self {
        Self {
            retry: RetryPolicy::new(max_attempts, wait_between),
            ..Self::default()
        }
    }

    /// Returns the per-attempt timeout as an `Option`.
    #[inline]
    pub fn default_attempt_timeout(&self) -> Option<Duration> {
        if self.attempt_timeout == Duration::ZERO {
            None
        } else {
            Some(self.attempt_timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `retry = RetryPolicy::default()` (3 attempts, 500ms apart)
    /// - `attempt_timeout = 0s` (no timeout)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            attempt_timeout: Duration::ZERO,
            bus_capacity: 1024,
        }
    }
}
