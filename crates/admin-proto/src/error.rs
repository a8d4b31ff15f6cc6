//! Error types for the meta-admin-proto crate

use crate::rpc::RpcCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtoError {
    #[error("Invalid endpoint '{input}': {reason}")]
    InvalidEndpoint { input: String, reason: String },

    #[error("Unknown RPC identifier: {0}")]
    UnknownRpc(String),

    #[error("Failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode {rpc} payload: {source}")]
    Decode {
        rpc: RpcCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed frame: {0}")]
    MalformedFrame(#[source] serde_json::Error),
}
