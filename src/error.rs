/*!
 * Error types for the meta admin client
 */

use meta_admin_connect::{ConnectError, DispatchError};
use meta_admin_proto::{ErrorCode, ProtoError, RpcCode};
use meta_admin_resilience::ResilienceError;
use std::path::PathBuf;
use thiserror::Error;

/// Result of one admin wrapper: the typed response, or an error that may
/// still carry it
pub type AdminResult<T> = Result<T, AdminError<T>>;

/// Failure of one administrative call
#[derive(Error, Debug)]
pub enum AdminError<R> {
    /// The leader answered with a non-OK status; the full response is kept
    #[error("{operation} rejected with {code}: {hint}")]
    Rejected {
        operation: RpcCode,
        code: ErrorCode,
        hint: String,
        response: Box<R>,
    },

    /// No authoritative answer was obtained
    #[error("{operation} failed: {source}")]
    Dispatch {
        operation: RpcCode,
        #[source]
        source: DispatchError,
    },

    /// The request could not be encoded
    #[error("Failed to encode request: {0}")]
    Encode(#[from] ProtoError),

    /// The reply decoded to a different RPC than the one requested
    #[error("{operation} received a response of a different kind")]
    UnexpectedResponse { operation: RpcCode },
}

impl<R> AdminError<R> {
    pub fn operation(&self) -> Option<RpcCode> {
        match self {
            AdminError::Rejected { operation, .. }
            | AdminError::Dispatch { operation, .. }
            | AdminError::UnexpectedResponse { operation } => Some(*operation),
            AdminError::Encode(_) => None,
        }
    }

    /// Status code reported by the server, if it answered at all
    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            AdminError::Rejected { code, .. } => Some(code),
            _ => None,
        }
    }

    /// The typed response that accompanied a rejection
    pub fn response(&self) -> Option<&R> {
        match self {
            AdminError::Rejected { response, .. } => Some(response),
            _ => None,
        }
    }

    pub fn into_response(self) -> Option<R> {
        match self {
            AdminError::Rejected { response, .. } => Some(*response),
            _ => None,
        }
    }

    pub fn dispatch_error(&self) -> Option<&DispatchError> {
        match self {
            AdminError::Dispatch { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failure to load or apply client configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid meta server address: {0}")]
    Endpoint(#[source] ProtoError),

    #[error("No meta servers configured")]
    NoMetaServers,

    #[error(transparent)]
    Policy(#[from] ResilienceError),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
