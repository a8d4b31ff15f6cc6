//! Error types for the meta-admin-connect crate

use meta_admin_proto::{Endpoint, ErrorCode, ProtoError};
use meta_admin_resilience::ResilienceError;
use std::time::Duration;
use thiserror::Error;

/// Failure of the physical connection layer
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection closed by peer")]
    Closed,

    #[error("Frame error: {0}")]
    Frame(#[from] ProtoError),

    #[error("Other transport error: {0}")]
    Other(String),
}

/// Failure of one round trip through a [`Session`](crate::Session).
///
/// Every variant is transient from the dispatcher's point of view.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Connection to {endpoint} failed: {source}")]
    Connect {
        endpoint: Endpoint,
        #[source]
        source: TransportError,
    },

    #[error("Call to {endpoint} timed out after {timeout:?}")]
    Timeout { endpoint: Endpoint, timeout: Duration },

    #[error("Transport failure talking to {endpoint}: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: TransportError,
    },

    #[error("Undecodable response from {endpoint}: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: ProtoError,
    },

    #[error("Protocol violation from {endpoint}: {reason}")]
    Protocol { endpoint: Endpoint, reason: String },
}

impl SessionError {
    pub fn endpoint(&self) -> &Endpoint {
        match self {
            SessionError::Connect { endpoint, .. }
            | SessionError::Timeout { endpoint, .. }
            | SessionError::Transport { endpoint, .. }
            | SessionError::Decode { endpoint, .. }
            | SessionError::Protocol { endpoint, .. } => endpoint,
        }
    }
}

/// Why a single attempt did not produce an authoritative answer
#[derive(Error, Debug)]
pub enum AttemptError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("{endpoint} is not the leader{}", forward_suffix(.hint))]
    Redirected {
        endpoint: Endpoint,
        hint: Option<Endpoint>,
    },

    #[error("{endpoint} is unavailable ({code}): {hint_message}")]
    Unavailable {
        endpoint: Endpoint,
        code: ErrorCode,
        hint_message: String,
    },
}

fn forward_suffix(hint: &Option<Endpoint>) -> String {
    match hint {
        Some(leader) => format!(", forwarded to {}", leader),
        None => String::new(),
    }
}

/// Terminal failure of a dispatched operation.
///
/// Each variant names the last endpoint attempted and the number of attempts
/// made; all but [`DispatchError::Cancelled`] carry the last underlying error.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Gave up after {attempts} attempts, last tried {endpoint}: {last_error}")]
    Exhausted {
        endpoint: Endpoint,
        attempts: u32,
        #[source]
        last_error: AttemptError,
    },

    #[error(
        "No endpoint answered authoritatively after {rounds} rounds ({attempts} attempts, last tried {endpoint}): {last_error}"
    )]
    NoAuthoritativeEndpoint {
        endpoint: Endpoint,
        attempts: u32,
        rounds: u32,
        #[source]
        last_error: AttemptError,
    },

    #[error("Deadline of {deadline:?} exceeded after {attempts} attempts, last tried {endpoint}")]
    DeadlineExceeded {
        endpoint: Endpoint,
        attempts: u32,
        deadline: Duration,
        #[source]
        last_error: Option<AttemptError>,
    },

    #[error("Cancelled by caller after {attempts} attempts")]
    Cancelled {
        endpoint: Option<Endpoint>,
        attempts: u32,
    },
}

impl DispatchError {
    /// True when the retry budget, deadline or rounds ran out
    pub fn is_exhaustion(&self) -> bool {
        matches!(
            self,
            DispatchError::Exhausted { .. }
                | DispatchError::NoAuthoritativeEndpoint { .. }
                | DispatchError::DeadlineExceeded { .. }
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, DispatchError::Cancelled { .. })
    }

    /// Last endpoint attempted, if any attempt was made
    pub fn endpoint(&self) -> Option<&Endpoint> {
        match self {
            DispatchError::Exhausted { endpoint, .. }
            | DispatchError::NoAuthoritativeEndpoint { endpoint, .. }
            | DispatchError::DeadlineExceeded { endpoint, .. } => Some(endpoint),
            DispatchError::Cancelled { endpoint, .. } => endpoint.as_ref(),
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            DispatchError::Exhausted { attempts, .. }
            | DispatchError::NoAuthoritativeEndpoint { attempts, .. }
            | DispatchError::DeadlineExceeded { attempts, .. }
            | DispatchError::Cancelled { attempts, .. } => *attempts,
        }
    }

    pub fn last_error(&self) -> Option<&AttemptError> {
        match self {
            DispatchError::Exhausted { last_error, .. }
            | DispatchError::NoAuthoritativeEndpoint { last_error, .. } => Some(last_error),
            DispatchError::DeadlineExceeded { last_error, .. } => last_error.as_ref(),
            DispatchError::Cancelled { .. } => None,
        }
    }
}

/// Errors raised while assembling a pool or dispatcher
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("No metadata endpoints configured")]
    NoEndpoints,

    #[error(transparent)]
    Policy(#[from] ResilienceError),
}
