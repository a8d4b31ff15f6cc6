//! Transport seam between sessions and the network
//!
//! A [`Transport`] opens [`Connection`]s to endpoints; a connection performs
//! one request/response exchange at a time. [`TcpTransport`] is the shipped
//! implementation: length-delimited JSON frames over a TCP stream.

use crate::error::TransportError;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use meta_admin_proto::{Endpoint, RequestFrame, ResponseFrame, MAX_FRAME_LEN};
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use tracing::debug;

/// Factory for connections to metadata replicas
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn Connection>, TransportError>;
}

/// One open connection to a replica
#[async_trait]
pub trait Connection: Send {
    /// Send `request` and wait for the matching response frame
    async fn round_trip(&mut self, request: RequestFrame) -> Result<ResponseFrame, TransportError>;
}

/// Codec used on both ends of a TCP connection
pub fn frame_codec() -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .max_frame_length(MAX_FRAME_LEN)
        .new_codec()
}

/// Plain TCP transport
#[derive(Debug, Clone)]
pub struct TcpTransport {
    nodelay: bool,
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl TcpTransport {
    pub fn new() -> Self {
        Self { nodelay: true }
    }

    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn Connection>, TransportError> {
        debug!("Opening TCP connection to {}", endpoint);

        let stream = TcpStream::connect((endpoint.host(), endpoint.port())).await?;
        stream.set_nodelay(self.nodelay)?;

        Ok(Box::new(TcpConnection {
            framed: Framed::new(stream, frame_codec()),
        }))
    }
}

struct TcpConnection {
    framed: Framed<TcpStream, LengthDelimitedCodec>,
}

#[async_trait]
impl Connection for TcpConnection {
    async fn round_trip(&mut self, request: RequestFrame) -> Result<ResponseFrame, TransportError> {
        self.framed.send(request.encode()?).await?;

        match self.framed.next().await {
            Some(Ok(buf)) => Ok(ResponseFrame::decode(&buf)?),
            Some(Err(e)) => Err(TransportError::Io(e)),
            None => Err(TransportError::Closed),
        }
    }
}
