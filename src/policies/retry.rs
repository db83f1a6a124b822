//! # Retry policy for delivery sequences.
//!
//! [`RetryPolicy`] bounds how many attempts a destination gets and how long to wait
//! between them. The wait is **fixed**: it does not grow with the attempt number.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use eventbridge::RetryPolicy;
//!
//! let retry = RetryPolicy::new(3, Duration::from_millis(500));
//!
//! assert_eq!(retry.next(1), Some(Duration::from_millis(500)));
//! assert_eq!(retry.next(2), Some(Duration::from_millis(500)));
//! assert_eq!(retry.next(3), None); // third attempt was the last one
//! ```

use std::time::Duration;

/// Fixed-delay retry policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts per destination, including the first one (`0` is treated as `1`).
    pub max_attempts: u32,
    /// Delay between a failed attempt and the next one.
    pub wait_between: Duration,
}

impl Default for RetryPolicy {
    /// Returns a policy with:
    /// - `max_attempts = 3`;
    /// - `wait_between = 500ms`.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            wait_between: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget and fixed delay.
    pub fn new(max_attempts: u32, wait_between: Duration) -> Self {
        Self {
            max_attempts,
            wait_between,
        }
    }

    /// Attempt budget clamped to a minimum of 1.
    #[inline]
    pub fn max_attempts_clamped(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Returns the delay before the attempt following `attempt` (1-based),
    /// or `None` once the budget is spent.
    pub fn next(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts_clamped() {
            None
        } else {
            Some(self.wait_between)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_is_constant() {
        let policy = RetryPolicy::new(10, Duration::from_millis(250));
        for attempt in 1..10 {
            assert_eq!(
                policy.next(attempt),
                Some(Duration::from_millis(250)),
                "attempt {attempt} should wait the fixed delay"
            );
        }
        assert_eq!(policy.next(10), None);
    }

    #[test]
    fn test_zero_attempts_behaves_as_one() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        assert_eq!(policy.max_attempts_clamped(), 1);
        assert_eq!(policy.next(1), None);
    }

    #[test]
    fn test_attempts_past_budget_stay_exhausted() {
        let policy = RetryPolicy::new(2, Duration::ZERO);
        assert_eq!(policy.next(1), Some(Duration::ZERO));
        assert_eq!(policy.next(2), None);
        assert_eq!(policy.next(u32::MAX), None);
    }
}
