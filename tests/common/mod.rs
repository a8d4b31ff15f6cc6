//! In-memory replicas for driving MetaAdminClient end to end

#![allow(dead_code)]

use async_trait::async_trait;
use meta_admin::connect::{Connection, Transport, TransportError};
use meta_admin::proto::{AdminResponse, Endpoint, ErrorCode, RequestFrame, ResponseFrame};
use meta_admin::{MetaAdminClient, RetryPolicy};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What one replica answers to every request
#[derive(Debug, Clone)]
pub enum Replica {
    /// Leader answering with this body
    Leader(Value),
    /// Follower pointing at the leader
    Follower(Option<Endpoint>),
    /// Replica answering a bare status
    Status(ErrorCode),
    /// Nothing listening
    Down,
}

#[derive(Clone, Default)]
pub struct Cluster {
    replicas: Arc<Mutex<HashMap<Endpoint, Replica>>>,
    calls: Arc<Mutex<Vec<Endpoint>>>,
}

impl Cluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, endpoint: &Endpoint, replica: Replica) {
        self.replicas
            .lock()
            .unwrap()
            .insert(endpoint.clone(), replica);
    }

    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.lock().unwrap().clone()
    }

    fn replica(&self, endpoint: &Endpoint) -> Replica {
        self.replicas
            .lock()
            .unwrap()
            .get(endpoint)
            .cloned()
            .unwrap_or(Replica::Down)
    }
}

#[async_trait]
impl Transport for Cluster {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn Connection>, TransportError> {
        if let Replica::Down = self.replica(endpoint) {
            self.calls.lock().unwrap().push(endpoint.clone());
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(Box::new(ReplicaConnection {
            endpoint: endpoint.clone(),
            cluster: self.clone(),
        }))
    }
}

struct ReplicaConnection {
    endpoint: Endpoint,
    cluster: Cluster,
}

#[async_trait]
impl Connection for ReplicaConnection {
    async fn round_trip(&mut self, request: RequestFrame) -> Result<ResponseFrame, TransportError> {
        self.cluster.calls.lock().unwrap().push(self.endpoint.clone());

        let status = |code: ErrorCode| AdminResponse::status_only(request.rpc, code).to_body();

        match self.cluster.replica(&self.endpoint) {
            Replica::Leader(body) => Ok(ResponseFrame::reply_to(&request, body)),
            Replica::Follower(leader) => {
                let frame =
                    ResponseFrame::reply_to(&request, status(ErrorCode::FORWARD_TO_OTHERS)?);
                Ok(match leader {
                    Some(leader) => frame.with_forward_to(leader),
                    None => frame,
                })
            }
            Replica::Status(code) => Ok(ResponseFrame::reply_to(&request, status(code)?)),
            Replica::Down => Err(TransportError::Closed),
        }
    }
}

pub fn ep(s: &str) -> Endpoint {
    s.parse().unwrap()
}

pub fn policy() -> RetryPolicy {
    RetryPolicy::deterministic()
        .with_max_attempts(10)
        .with_backoff(Duration::from_millis(10), Duration::from_millis(100))
        .with_deadline(Duration::from_secs(30))
}

pub fn client(names: &[&str], cluster: &Cluster, policy: RetryPolicy) -> MetaAdminClient {
    let endpoints = names.iter().map(|s| ep(s)).collect();
    MetaAdminClient::with_transport(endpoints, policy, Arc::new(cluster.clone())).unwrap()
}
