//! Operation descriptors and per-call context

use meta_admin_proto::{AdminRequest, ProtoError, RpcCode};
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One remote call: identifier, typed request and its encoded body.
///
/// Built once per call and reused unchanged by every attempt. The identifier
/// also fixes the response shape the reply is decoded into.
#[derive(Debug, Clone)]
pub struct Operation {
    rpc: RpcCode,
    request: AdminRequest,
    body: Value,
}

impl Operation {
    pub fn new(request: impl Into<AdminRequest>) -> Result<Self, ProtoError> {
        let request = request.into();
        let body = request.to_body()?;
        Ok(Self {
            rpc: request.rpc(),
            request,
            body,
        })
    }

    pub fn rpc(&self) -> RpcCode {
        self.rpc
    }

    pub fn request(&self) -> &AdminRequest {
        &self.request
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

/// Caller-side bounds for one dispatched call
///
/// # Example
///
/// ```
/// use meta_admin_connect::CallContext;
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let ctx = CallContext::new()
///     .with_timeout(Duration::from_secs(5))
///     .with_cancellation(token.clone());
/// assert_eq!(ctx.timeout(), Some(Duration::from_secs(5)));
/// assert!(!ctx.is_cancelled());
/// token.cancel();
/// assert!(ctx.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the whole call; the tighter of this and the policy deadline wins
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Resolves once the caller cancels; never resolves without a token
    pub async fn cancelled(&self) {
        match &self.cancel {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    }
}
