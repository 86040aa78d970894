//! Bounded retry policy with an exponential delay schedule.

use std::time::Duration;

/// Default number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry; doubles on each further retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Retry budget and backoff schedule for transient telemetry failures.
///
/// The schedule is a first-class value so the attempt bound and delays can
/// be asserted directly in tests: with the defaults a failing call makes
/// 4 attempts total, sleeping 1s, 2s and 4s between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,

    /// Delay before the first retry.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Policy with a custom budget and base delay.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Total attempts a call may make (initial attempt plus retries).
    pub fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay before retry number `retry` (0-based): `base * 2^retry`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry.min(20))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_BASE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.total_attempts(), 4);
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    }

    #[test]
    fn test_none_policy() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.total_attempts(), 1);
        assert_eq!(policy.delay_for(0), Duration::ZERO);
    }

    #[test]
    fn test_large_retry_count_saturates() {
        let policy = RetryPolicy::new(64, Duration::from_millis(1));
        // The exponent is capped so the multiplier cannot overflow.
        assert_eq!(policy.delay_for(64), policy.delay_for(20));
    }
}
