//! Retry policy for listing fetches: bounded attempts, linear backoff.

use crate::config::FetchRetryConfig;
use std::time::Duration;

/// Bounded-attempt policy with a linear backoff ramp.
///
/// `attempt` is 1-based. After attempt N fails the caller sleeps
/// `backoff_factor * N` before attempt N+1; once `max_attempts` is spent
/// the failure is permanent.
#[derive(Debug, Clone, Copy)]
pub struct FetchRetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Backoff factor; delay before attempt N+1 is `factor * N`.
    pub backoff_factor: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for FetchRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            backoff_factor: Duration::from_secs(1),
            timeout: Duration::from_secs(5),
        }
    }
}

impl FetchRetryPolicy {
    pub fn from_config(cfg: &FetchRetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts.max(1),
            backoff_factor: Duration::from_secs_f64(cfg.backoff_factor_secs.max(0.0)),
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }

    /// Whether another attempt is allowed after `attempt` failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay to sleep after a failed `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_factor.saturating_mul(attempt)
    }
}
