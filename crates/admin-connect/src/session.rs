//! Session: one lazily (re)connected channel to one metadata replica

use crate::error::SessionError;
use crate::operation::Operation;
use crate::transport::{Connection, Transport};
use meta_admin_proto::{AdminResponse, Endpoint, RequestFrame};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Decoded reply of a single round trip
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub response: AdminResponse,
    /// Leader hint attached by a replica that forwarded the call
    pub forward_to: Option<Endpoint>,
}

/// Snapshot of a session's health
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub endpoint: Endpoint,
    pub connected: bool,
    pub in_flight: usize,
    pub last_success: Option<Instant>,
    pub last_failure: Option<Instant>,
    pub consecutive_failures: u32,
}

#[derive(Debug, Default)]
struct Health {
    last_success: Option<Instant>,
    last_failure: Option<Instant>,
    consecutive_failures: u32,
}

/// Idle connections kept per session; extra ones are closed on release
const MAX_IDLE_CONNECTIONS: usize = 4;

/// Connection state for one fixed [`Endpoint`].
///
/// A call takes an idle connection, or opens a new one when none is idle,
/// so concurrent calls never queue behind each other and the timeout only
/// bounds their own round trip. A connection goes back to the idle list
/// once a well-formed reply has been read; a failed, timed out or cancelled
/// call drops it.
pub struct Session {
    endpoint: Endpoint,
    transport: Arc<dyn Transport>,
    idle: Mutex<Vec<Box<dyn Connection>>>,
    /// Bumped by `close`; a round trip started under an older epoch drops its connection
    epoch: AtomicU64,
    next_seq: AtomicU64,
    in_flight: AtomicUsize,
    health: Mutex<Health>,
}

impl Session {
    pub fn new(endpoint: Endpoint, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint,
            transport,
            idle: Mutex::new(Vec::new()),
            epoch: AtomicU64::new(0),
            next_seq: AtomicU64::new(1),
            in_flight: AtomicUsize::new(0),
            health: Mutex::new(Health::default()),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Perform exactly one round trip, bounded by `timeout`
    pub async fn call(&self, op: &Operation, timeout: Duration) -> Result<Reply, SessionError> {
        let _in_flight = InFlight::enter(&self.in_flight);

        let result = match tokio::time::timeout(timeout, self.round_trip(op)).await {
            Ok(result) => result,
            Err(_) => Err(SessionError::Timeout {
                endpoint: self.endpoint.clone(),
                timeout,
            }),
        };

        let mut health = self.health.lock().unwrap_or_else(PoisonError::into_inner);
        match &result {
            Ok(_) => {
                health.last_success = Some(Instant::now());
                health.consecutive_failures = 0;
            }
            Err(e) => {
                debug!(endpoint = %self.endpoint, error = %e, "Session call failed");
                health.last_failure = Some(Instant::now());
                health.consecutive_failures += 1;
            }
        }

        result
    }

    async fn round_trip(&self, op: &Operation) -> Result<Reply, SessionError> {
        let epoch = self.epoch.load(Ordering::Acquire);
        let mut conn = self.acquire().await?;

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let request = RequestFrame::new(seq, op.rpc(), op.body().clone());

        let frame = conn
            .round_trip(request)
            .await
            .map_err(|source| SessionError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        if frame.seq != seq || frame.rpc != op.rpc() {
            return Err(SessionError::Protocol {
                endpoint: self.endpoint.clone(),
                reason: format!(
                    "expected reply to {} #{}, got {} #{}",
                    op.rpc(),
                    seq,
                    frame.rpc,
                    frame.seq
                ),
            });
        }

        // The frame itself was well-formed, so the connection stays usable
        // even if the body does not match the expected response shape.
        self.release(conn, epoch);

        let response =
            AdminResponse::decode(frame.rpc, frame.body).map_err(|source| SessionError::Decode {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        Ok(Reply {
            response,
            forward_to: frame.forward_to,
        })
    }

    /// Take an idle connection or open a new one
    async fn acquire(&self) -> Result<Box<dyn Connection>, SessionError> {
        let reused = {
            let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
            idle.pop()
        };
        if let Some(conn) = reused {
            return Ok(conn);
        }

        debug!("Connecting to {}", self.endpoint);
        self.transport
            .connect(&self.endpoint)
            .await
            .map_err(|source| SessionError::Connect {
                endpoint: self.endpoint.clone(),
                source,
            })
    }

    fn release(&self, conn: Box<dyn Connection>, epoch: u64) {
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if self.epoch.load(Ordering::Acquire) == epoch && idle.len() < MAX_IDLE_CONNECTIONS {
            idle.push(conn);
        }
    }

    /// Drop idle connections; calls in flight drop theirs when they finish
    pub fn close(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        let closed = {
            let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *idle).len()
        };
        if closed > 0 {
            debug!("Closed {} connections to {}", closed, self.endpoint);
        }
    }

    /// Whether a connection is open, idle or in use by a call
    pub fn is_connected(&self) -> bool {
        self.idle_connections() > 0 || self.in_flight() > 0
    }

    pub fn idle_connections(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> SessionStats {
        let health = self.health.lock().unwrap_or_else(PoisonError::into_inner);
        SessionStats {
            endpoint: self.endpoint.clone(),
            connected: self.is_connected(),
            in_flight: self.in_flight(),
            last_success: health.last_success,
            last_failure: health.last_failure,
            consecutive_failures: health.consecutive_failures,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        InFlight(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use meta_admin_proto::{ErrorCode, ListAppsRequest, ResponseFrame, RpcCode};
    use std::sync::atomic::AtomicBool;

    /// Answers every request with `ERR_OK`, optionally tampering with the sequence number
    #[derive(Default)]
    struct EchoTransport {
        connects: AtomicUsize,
        wrong_seq: AtomicBool,
        hang: AtomicBool,
    }

    struct EchoConnection {
        transport: Arc<EchoTransport>,
    }

    #[async_trait]
    impl Transport for Arc<EchoTransport> {
        async fn connect(&self, _: &Endpoint) -> Result<Box<dyn Connection>, TransportError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(EchoConnection {
                transport: Arc::clone(self),
            }))
        }
    }

    #[async_trait]
    impl Connection for EchoConnection {
        async fn round_trip(
            &mut self,
            request: RequestFrame,
        ) -> Result<ResponseFrame, TransportError> {
            if self.transport.hang.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            let body = AdminResponse::status_only(request.rpc, ErrorCode::OK).to_body()?;
            let mut frame = ResponseFrame::reply_to(&request, body);
            if self.transport.wrong_seq.load(Ordering::SeqCst) {
                frame.seq += 100;
            }
            Ok(frame)
        }
    }

    fn session() -> (Session, Arc<EchoTransport>) {
        let transport = Arc::new(EchoTransport::default());
        let endpoint: Endpoint = "127.0.0.1:34601".parse().unwrap();
        let session = Session::new(endpoint, Arc::new(Arc::clone(&transport)));
        (session, transport)
    }

    fn list_apps() -> Operation {
        Operation::new(ListAppsRequest::default()).unwrap()
    }

    #[tokio::test]
    async fn test_connection_is_reused() {
        let (session, transport) = session();
        let op = list_apps();

        for _ in 0..3 {
            let reply = session.call(&op, Duration::from_secs(1)).await.unwrap();
            assert_eq!(reply.response.rpc(), RpcCode::ListApps);
            assert!(reply.response.err().is_ok());
        }

        assert_eq!(transport.connects.load(Ordering::SeqCst), 1);
        let stats = session.stats();
        assert!(stats.connected);
        assert!(stats.last_success.is_some());
        assert_eq!(stats.consecutive_failures, 0);
        assert_eq!(stats.in_flight, 0);
    }

    #[tokio::test]
    async fn test_sequence_mismatch_forces_reconnect() {
        let (session, transport) = session();
        let op = list_apps();

        transport.wrong_seq.store(true, Ordering::SeqCst);
        let err = session.call(&op, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, SessionError::Protocol { .. }));
        assert!(!session.is_connected());
        assert_eq!(session.stats().consecutive_failures, 1);

        transport.wrong_seq.store(false, Ordering::SeqCst);
        session.call(&op, Duration::from_secs(1)).await.unwrap();
        assert_eq!(transport.connects.load(Ordering::SeqCst), 2);
        assert_eq!(session.stats().consecutive_failures, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_drops_connection() {
        let (session, transport) = session();
        let op = list_apps();

        transport.hang.store(true, Ordering::SeqCst);
        let err = session.call(&op, Duration::from_secs(2)).await.unwrap_err();
        assert!(matches!(err, SessionError::Timeout { .. }));
        assert!(!session.is_connected());

        transport.hang.store(false, Ordering::SeqCst);
        session.call(&op, Duration::from_secs(2)).await.unwrap();
        assert_eq!(transport.connects.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_close_forces_lazy_reconnect() {
        let (session, transport) = session();
        let op = list_apps();

        session.call(&op, Duration::from_secs(1)).await.unwrap();
        session.close();
        assert!(!session.is_connected());

        session.call(&op, Duration::from_secs(1)).await.unwrap();
        assert_eq!(transport.connects.load(Ordering::SeqCst), 2);
    }
}
