//! Retry policy and backoff calculation
//!
//! A [`RetryPolicy`] is plain configuration: how many attempts an operation may
//! make, how long each attempt may take, how long to back off after a
//! transient failure, and the overall deadline. It carries no mutable state;
//! per-call accounting lives in [`RetryBudget`](crate::RetryBudget).

use crate::error::ResilienceError;
use rand::Rng;
use std::time::Duration;

/// Bounds applied to every dispatched operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, redirects included
    pub max_attempts: u32,

    /// Upper bound on a single round trip
    pub attempt_timeout: Duration,

    /// Backoff before the first retry is derived from this base
    pub backoff_base: Duration,

    /// Backoff never exceeds this value
    pub backoff_cap: Duration,

    /// Scale each backoff by a random factor in `[0.5, 1.0]`
    pub jitter: bool,

    /// Overall time bound for one operation, measured from its first attempt
    pub deadline: Duration,

    /// How many full passes over the configured replicas are allowed before
    /// giving up on finding an authoritative one
    pub max_rounds: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            attempt_timeout: Duration::from_secs(3),
            backoff_base: Duration::from_millis(50),
            backoff_cap: Duration::from_secs(2),
            jitter: true,
            deadline: Duration::from_secs(30),
            max_rounds: 3,
        }
    }
}

impl RetryPolicy {
    /// Policy with no jitter, handy when delays must be predictable
    pub fn deterministic() -> Self {
        Self {
            jitter: false,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_backoff(mut self, base: Duration, cap: Duration) -> Self {
        self.backoff_base = base;
        self.backoff_cap = cap;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Check that every bound is usable
    pub fn validate(&self) -> Result<(), ResilienceError> {
        if self.max_attempts == 0 {
            return Err(ResilienceError::invalid("max_attempts", "must be at least 1"));
        }
        if self.max_rounds == 0 {
            return Err(ResilienceError::invalid("max_rounds", "must be at least 1"));
        }
        if self.attempt_timeout.is_zero() {
            return Err(ResilienceError::invalid("attempt_timeout", "must be non-zero"));
        }
        if self.deadline.is_zero() {
            return Err(ResilienceError::invalid("deadline", "must be non-zero"));
        }
        if self.backoff_cap < self.backoff_base {
            return Err(ResilienceError::invalid(
                "backoff_cap",
                format!(
                    "({:?}) is smaller than backoff_base ({:?})",
                    self.backoff_cap, self.backoff_base
                ),
            ));
        }
        Ok(())
    }

    /// Upper bound of the backoff after the given (1-based) attempt failed:
    /// `min(base * 2^attempt, cap)`
    pub fn max_backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.backoff_base
            .checked_mul(factor)
            .unwrap_or(self.backoff_cap)
            .min(self.backoff_cap)
    }

    /// Delay to sleep after the given (1-based) attempt failed transiently
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let capped = self.max_backoff(attempt);
        if self.jitter {
            let factor = rand::rng().random_range(0.5..=1.0);
            capped.mul_f64(factor)
        } else {
            capped
        }
    }
}
