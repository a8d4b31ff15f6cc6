//! Scripted in-memory transport shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use meta_admin_connect::{
    CallContext, Connection, Dispatcher, SessionPool, Transport, TransportError,
};
use meta_admin_proto::{AdminResponse, Endpoint, ErrorCode, RequestFrame, ResponseFrame};
use meta_admin_resilience::RetryPolicy;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a scripted replica reacts
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Answer with the given status code and an otherwise default body
    Status(ErrorCode),
    /// Answer `ERR_FORWARD_TO_OTHERS`, optionally naming the leader
    Forward(Option<Endpoint>),
    /// Answer with this exact body
    Body(Value),
    /// Answer `ERR_OK` after a delay
    Slow(Duration),
    /// Refuse the connection
    Refuse,
    /// Accept the connection, then drop it on the first request
    Drop,
    /// Never answer
    Hang,
}

#[derive(Default)]
struct Script {
    behaviors: HashMap<Endpoint, Behavior>,
    calls: Vec<Endpoint>,
    connects: HashMap<Endpoint, usize>,
}

/// Transport whose replicas follow a per-endpoint [`Behavior`].
///
/// Endpoints without a behavior refuse connections.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, endpoint: &Endpoint, behavior: Behavior) {
        let mut script = self.script.lock().unwrap();
        script.behaviors.insert(endpoint.clone(), behavior);
    }

    /// Every endpoint a request reached (or tried to reach), in order
    pub fn calls(&self) -> Vec<Endpoint> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn connects(&self, endpoint: &Endpoint) -> usize {
        let script = self.script.lock().unwrap();
        script.connects.get(endpoint).copied().unwrap_or(0)
    }

    fn behavior(&self, endpoint: &Endpoint) -> Behavior {
        let script = self.script.lock().unwrap();
        script
            .behaviors
            .get(endpoint)
            .cloned()
            .unwrap_or(Behavior::Refuse)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn Connection>, TransportError> {
        let refused = matches!(self.behavior(endpoint), Behavior::Refuse);
        {
            let mut script = self.script.lock().unwrap();
            *script.connects.entry(endpoint.clone()).or_default() += 1;
            if refused {
                script.calls.push(endpoint.clone());
            }
        }

        if refused {
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("{} refused the connection", endpoint),
            )));
        }

        Ok(Box::new(ScriptedConnection {
            endpoint: endpoint.clone(),
            transport: self.clone(),
        }))
    }
}

struct ScriptedConnection {
    endpoint: Endpoint,
    transport: ScriptedTransport,
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn round_trip(&mut self, request: RequestFrame) -> Result<ResponseFrame, TransportError> {
        self.transport
            .script
            .lock()
            .unwrap()
            .calls
            .push(self.endpoint.clone());

        let status = |code: ErrorCode| AdminResponse::status_only(request.rpc, code).to_body();

        match self.transport.behavior(&self.endpoint) {
            Behavior::Status(code) => Ok(ResponseFrame::reply_to(&request, status(code)?)),
            Behavior::Forward(hint) => {
                let frame =
                    ResponseFrame::reply_to(&request, status(ErrorCode::FORWARD_TO_OTHERS)?);
                Ok(match hint {
                    Some(leader) => frame.with_forward_to(leader),
                    None => frame,
                })
            }
            Behavior::Body(body) => Ok(ResponseFrame::reply_to(&request, body)),
            Behavior::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(ResponseFrame::reply_to(&request, status(ErrorCode::OK)?))
            }
            Behavior::Refuse | Behavior::Drop => Err(TransportError::Closed),
            Behavior::Hang => std::future::pending().await,
        }
    }
}

pub fn ep(s: &str) -> Endpoint {
    s.parse().unwrap()
}

pub fn endpoints(names: &[&str]) -> Vec<Endpoint> {
    names.iter().map(|s| ep(s)).collect()
}

/// Predictable policy: no jitter, generous budget
pub fn test_policy() -> RetryPolicy {
    RetryPolicy::deterministic()
        .with_max_attempts(10)
        .with_attempt_timeout(Duration::from_secs(3))
        .with_backoff(Duration::from_millis(50), Duration::from_millis(400))
        .with_deadline(Duration::from_secs(30))
        .with_max_rounds(3)
}

pub fn dispatcher(
    names: &[&str],
    transport: &ScriptedTransport,
    policy: RetryPolicy,
) -> Arc<Dispatcher> {
    let pool = SessionPool::new(endpoints(names), Arc::new(transport.clone())).unwrap();
    Arc::new(Dispatcher::new(Arc::new(pool), policy).unwrap())
}

pub fn ctx() -> CallContext {
    CallContext::new()
}
