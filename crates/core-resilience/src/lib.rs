//! Meta Admin Resilience: pure-logic retry primitives
//!
//! # Overview
//!
//! Building blocks for retrying calls against a replicated service:
//!
//! - **RetryPolicy**: attempt bound, per-attempt timeout, capped exponential
//!   backoff with optional jitter, overall deadline and round limit
//! - **RetryBudget**: per-operation accounting of attempts used and deadline left
//!
//! # Key Principles
//!
//! This crate is **pure logic** with zero knowledge of:
//! - Network protocols or connections
//! - Leaders, replicas or status codes
//!
//! The dispatcher in `meta-admin-connect` decides *what* to retry; this crate
//! only answers *how long* to wait and *whether* the budget allows another try.
//!
//! ```text
//!   attempt ──fail──▶ budget.attempts_exhausted()? ──yes──▶ give up
//!                           │ no
//!                           ▼
//!             sleep(budget.clamp(policy.backoff_delay(n)))
//!                           │
//!                           ▼
//!                 budget.is_expired()? ──yes──▶ give up
//!                           │ no
//!                           ▼
//!                       next attempt
//! ```
//!
//! # Usage Example
//!
//! ```
//! use meta_admin_resilience::{RetryBudget, RetryPolicy};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let policy = RetryPolicy::default()
//!     .with_max_attempts(5)
//!     .with_deadline(Duration::from_secs(10));
//! policy.validate().unwrap();
//!
//! let mut budget = RetryBudget::start(&policy, Some(Duration::from_secs(2)));
//! let attempt = budget.record_attempt();
//! let delay = budget.clamp(policy.backoff_delay(attempt));
//! assert!(delay <= Duration::from_secs(2));
//! # }
//! ```

pub mod budget;
pub mod error;
pub mod policy;

pub use budget::RetryBudget;
pub use error::ResilienceError;
pub use policy::RetryPolicy;

/// Prelude module for convenient imports
///
/// # Example
/// ```
/// use meta_admin_resilience::prelude::*;
/// ```
pub mod prelude {
    pub use super::budget::RetryBudget;
    pub use super::error::ResilienceError;
    pub use super::policy::RetryPolicy;
}
