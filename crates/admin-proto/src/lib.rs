//! Meta Admin Proto: typed schema for the metadata service's admin RPCs
//!
//! This crate carries everything that crosses the wire between the admin
//! client and a metadata replica:
//!
//! - **Endpoint**: `host:port` address of one replica
//! - **ErrorCode**: the textual status embedded in every response, plus its
//!   routing classification ([`StatusClass`])
//! - **Messages**: one request/response pair per admin RPC
//! - **RpcCode / AdminRequest / AdminResponse**: uniform sum types over all RPCs
//! - **Frames**: the JSON envelopes exchanged over a length-delimited stream
//!
//! It has no knowledge of sessions, retries or leaders; see `meta-admin-connect`.

pub mod code;
pub mod endpoint;
pub mod error;
pub mod frame;
pub mod messages;
pub mod rpc;

pub use code::{ErrorCode, StatusClass};
pub use endpoint::Endpoint;
pub use error::ProtoError;
pub use frame::{RequestFrame, ResponseFrame, MAX_FRAME_LEN};
pub use messages::*;
pub use rpc::{AdminRequest, AdminResponse, AdminRpc, MetaResponse, RpcCode};
