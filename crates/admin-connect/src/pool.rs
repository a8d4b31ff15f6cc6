//! SessionPool: per-endpoint session cache and the shared leader hint

use crate::error::ConnectError;
use crate::session::{Session, SessionStats};
use crate::transport::Transport;
use meta_admin_proto::Endpoint;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info};

/// Sessions for every replica the client has talked to, plus the current
/// best guess at which replica leads.
///
/// Sessions are created on first use and kept until [`close_all`] is called;
/// even then the `Session` objects stay cached and reconnect lazily. Neither
/// lock in here is ever held across a network wait.
///
/// [`close_all`]: SessionPool::close_all
///
/// # Example
///
/// ```
/// use meta_admin_connect::{SessionPool, TcpTransport};
/// use meta_admin_proto::Endpoint;
/// use std::sync::Arc;
///
/// let endpoints: Vec<Endpoint> = vec![
///     "10.0.0.1:34601".parse().unwrap(),
///     "10.0.0.2:34601".parse().unwrap(),
/// ];
/// let pool = SessionPool::new(endpoints, Arc::new(TcpTransport::new())).unwrap();
///
/// assert_eq!(pool.current_candidate().to_string(), "10.0.0.1:34601");
/// pool.on_redirect_hint(&"10.0.0.2:34601".parse().unwrap());
/// assert_eq!(pool.current_candidate().to_string(), "10.0.0.2:34601");
/// ```
pub struct SessionPool {
    /// Configured replicas in round-robin order, without duplicates
    endpoints: Vec<Endpoint>,

    transport: Arc<dyn Transport>,

    sessions: Mutex<HashMap<Endpoint, Arc<Session>>>,

    leader: RwLock<Option<Endpoint>>,
}

impl SessionPool {
    pub fn new(
        endpoints: impl IntoIterator<Item = Endpoint>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConnectError> {
        let mut seen = HashSet::new();
        let endpoints: Vec<Endpoint> = endpoints
            .into_iter()
            .filter(|ep| seen.insert(ep.clone()))
            .collect();

        if endpoints.is_empty() {
            return Err(ConnectError::NoEndpoints);
        }

        info!(
            "Session pool created for {} metadata endpoints: {}",
            endpoints.len(),
            endpoints
                .iter()
                .map(Endpoint::to_string)
                .collect::<Vec<_>>()
                .join(",")
        );

        Ok(Self {
            endpoints,
            transport,
            sessions: Mutex::new(HashMap::new()),
            leader: RwLock::new(None),
        })
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn is_configured(&self, endpoint: &Endpoint) -> bool {
        self.endpoints.contains(endpoint)
    }

    /// Session for `endpoint`, created on first use
    pub fn session_for(&self, endpoint: &Endpoint) -> Arc<Session> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(session) = sessions.get(endpoint) {
            return Arc::clone(session);
        }

        debug!("Creating session for {}", endpoint);
        let session = Arc::new(Session::new(endpoint.clone(), Arc::clone(&self.transport)));
        sessions.insert(endpoint.clone(), Arc::clone(&session));
        session
    }

    pub fn leader_hint(&self) -> Option<Endpoint> {
        self.leader
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The leader hint if one is known, else the first configured endpoint
    pub fn current_candidate(&self) -> Endpoint {
        self.leader_hint().unwrap_or_else(|| self.endpoints[0].clone())
    }

    /// Next configured endpoint after `from` in round-robin order that is not
    /// in `excluding`. Starts from the head of the list when `from` is not a
    /// configured endpoint.
    pub fn advance(&self, from: &Endpoint, excluding: &HashSet<Endpoint>) -> Option<Endpoint> {
        let len = self.endpoints.len();
        let start = match self.endpoints.iter().position(|ep| ep == from) {
            Some(pos) => pos + 1,
            None => 0,
        };

        (0..len)
            .map(|offset| &self.endpoints[(start + offset) % len])
            .find(|ep| !excluding.contains(*ep))
            .cloned()
    }

    /// A replica named `endpoint` as the leader
    pub fn on_redirect_hint(&self, endpoint: &Endpoint) {
        self.set_leader(endpoint, "redirect");
    }

    /// `endpoint` answered authoritatively
    pub fn on_success(&self, endpoint: &Endpoint) {
        self.set_leader(endpoint, "authoritative answer");
    }

    /// `endpoint` failed; forget it as leader, but never touch a hint that
    /// points elsewhere
    pub fn on_failure(&self, endpoint: &Endpoint) {
        let mut leader = self.leader.write().unwrap_or_else(PoisonError::into_inner);
        if leader.as_ref() == Some(endpoint) {
            info!("Clearing leader hint {} after failure", endpoint);
            *leader = None;
        }
    }

    fn set_leader(&self, endpoint: &Endpoint, reason: &str) {
        let mut leader = self.leader.write().unwrap_or_else(PoisonError::into_inner);
        if leader.as_ref() != Some(endpoint) {
            info!(
                "Leader hint changed: {} -> {} ({})",
                leader
                    .as_ref()
                    .map(Endpoint::to_string)
                    .unwrap_or_else(|| "unknown".to_string()),
                endpoint,
                reason
            );
            *leader = Some(endpoint.clone());
        }
    }

    /// Health snapshot of every session created so far, configured order first
    pub fn session_stats(&self) -> Vec<SessionStats> {
        let sessions: Vec<Arc<Session>> = {
            let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
            sessions.values().cloned().collect()
        };

        let mut stats: Vec<SessionStats> = sessions.iter().map(|s| s.stats()).collect();
        stats.sort_by_key(|s| {
            let rank = self
                .endpoints
                .iter()
                .position(|ep| *ep == s.endpoint)
                .unwrap_or(usize::MAX);
            (rank, s.endpoint.clone())
        });
        stats
    }

    /// Close every session's connection; later calls reconnect lazily
    pub fn close_all(&self) {
        info!("Closing all metadata sessions");
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        for session in sessions.values() {
            session.close();
        }
    }
}

impl std::fmt::Debug for SessionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionPool")
            .field("endpoints", &self.endpoints)
            .field("leader", &self.leader_hint())
            .finish_non_exhaustive()
    }
}
