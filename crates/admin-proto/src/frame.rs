//! Wire frames
//!
//! Each message on a connection is a length-delimited JSON document. A request
//! frame carries a connection-local sequence number, the RPC identifier and the
//! encoded request body; the response frame echoes both. When a replica answers
//! `ERR_FORWARD_TO_OTHERS` it may name the replica it believes is the leader in
//! `forward_to`.

use crate::endpoint::Endpoint;
use crate::error::ProtoError;
use crate::rpc::RpcCode;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound on a single encoded frame (16 MiB)
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestFrame {
    pub seq: u64,
    pub rpc: RpcCode,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFrame {
    pub seq: u64,
    pub rpc: RpcCode,
    /// Leader hint attached to a forward answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_to: Option<Endpoint>,
    pub body: Value,
}

impl RequestFrame {
    pub fn new(seq: u64, rpc: RpcCode, body: Value) -> Self {
        Self { seq, rpc, body }
    }

    pub fn encode(&self) -> Result<Bytes, ProtoError> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(ProtoError::Encode)
    }

    pub fn decode(buf: &[u8]) -> Result<Self, ProtoError> {
        serde_json::from_slice(buf).map_err(ProtoError::MalformedFrame)
    }
}

impl ResponseFrame {
    /// Build the reply to `request` with the given body
    pub fn reply_to(request: &RequestFrame, body: Value) -> Self {
        Self {
            seq: request.seq,
            rpc: request.rpc,
            forward_to: None,
            body,
        }
    }

    pub fn with_forward_to(mut self, leader: Endpoint) -> Self {
        self.forward_to = Some(leader);
        self
    }

    pub fn encode(&self) -> Result<Bytes, ProtoError> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(ProtoError::Encode)
    }

    pub fn decode(buf: &[u8]) -> Result<Self, ProtoError> {
        serde_json::from_slice(buf).map_err(ProtoError::MalformedFrame)
    }
}
