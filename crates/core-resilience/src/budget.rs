//! Per-operation attempt and deadline accounting
//!
//! A [`RetryBudget`] is created when an operation starts and tracks how many
//! attempts it has used and how much of its deadline is left. The clock is
//! `tokio::time::Instant`, so paused-time tests advance it deterministically.

use crate::policy::RetryPolicy;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Stand-in deadline for windows too large to add to the clock
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

#[derive(Debug, Clone)]
pub struct RetryBudget {
    started: Instant,
    window: Duration,
    deadline: Instant,
    attempts: u32,
    max_attempts: u32,
    attempt_timeout: Duration,
}

impl RetryBudget {
    /// Start a budget from `policy`, optionally tightened by a caller timeout
    pub fn start(policy: &RetryPolicy, caller_timeout: Option<Duration>) -> Self {
        let window = match caller_timeout {
            Some(timeout) => timeout.min(policy.deadline),
            None => policy.deadline,
        };
        let started = Instant::now();

        debug!(
            deadline_ms = window.as_millis() as u64,
            max_attempts = policy.max_attempts,
            "Retry budget started"
        );

        Self {
            started,
            window,
            deadline: started
                .checked_add(window)
                .unwrap_or_else(|| started + FAR_FUTURE),
            attempts: 0,
            max_attempts: policy.max_attempts,
            attempt_timeout: policy.attempt_timeout,
        }
    }

    /// Count one more attempt and return its 1-based number
    pub fn record_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn attempts_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Length of the whole window this budget was started with
    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Timeout for the next attempt: the policy bound, never past the deadline
    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout.min(self.remaining())
    }

    /// Shorten `delay` so that sleeping never overshoots the deadline
    pub fn clamp(&self, delay: Duration) -> Duration {
        delay.min(self.remaining())
    }
}
