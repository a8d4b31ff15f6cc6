//! Error types for the resilience crate

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResilienceError {
    /// A retry policy field is out of range
    #[error("Invalid retry policy: {field} {reason}")]
    InvalidPolicy { field: &'static str, reason: String },
}

impl ResilienceError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ResilienceError::InvalidPolicy {
            field,
            reason: reason.into(),
        }
    }
}
