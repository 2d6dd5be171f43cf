use std::time::Duration;

/// Bounded retry policy with capped exponential backoff.
///
/// Applied per endpoint: an endpoint gets `max_retries` attempts, with
/// `min(base_delay * 2^attempt, max_delay)` slept after failed attempt
/// `attempt` (0-based) while budget remains. The attempt counter resets
/// when the fetch loop falls back to the next endpoint.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts per endpoint. Must be at least 1.
    pub max_retries: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Ceiling for the doubled delays.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Returns the delay to sleep after failed attempt `attempt` (0-based).
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let doubled = self.base_delay.saturating_mul(1u32 << attempt.min(31));
        doubled.min(self.max_delay)
    }
}
