//! Dispatcher: the retry and failover state machine
//!
//! ```text
//!            ┌──────────────────────────────────────────────┐
//!            ▼                                              │
//!   Attempt(endpoint, n, visited) ──▶ session.call ──▶ classify
//!                                                          │
//!       Success ──────────────▶ done (hint := endpoint)    │
//!       TerminalFailure ──────▶ done, response intact      │
//!       Redirect(hint) ───────▶ next = hint, no backoff ───┤
//!       TransientFailure ─────▶ backoff, next = advance ───┘
//! ```
//!
//! Every loop iteration consumes one attempt. A redirect to an endpoint
//! already visited in the current round is a cycle; once every configured
//! endpoint has been visited in a round without an authoritative answer a new
//! round starts, up to `max_rounds`.

use crate::error::{AttemptError, ConnectError, DispatchError, SessionError};
use crate::operation::{CallContext, Operation};
use crate::pool::SessionPool;
use crate::session::Reply;
use meta_admin_proto::{AdminResponse, Endpoint, StatusClass};
use meta_admin_resilience::{RetryBudget, RetryPolicy};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Classified result of one attempt
#[derive(Debug)]
pub enum AttemptOutcome {
    /// The replica answered `ERR_OK`
    Success(AdminResponse),
    /// The replica is not the leader, optionally naming the one to ask next
    Redirect(Option<Endpoint>),
    /// Worth retrying elsewhere after a backoff
    TransientFailure(AttemptError),
    /// An authoritative application-level answer; never retried
    TerminalFailure(AdminResponse),
}

impl AttemptOutcome {
    /// Classify the result of a session call made against `endpoint`
    pub fn classify(endpoint: &Endpoint, result: Result<Reply, SessionError>) -> Self {
        let reply = match result {
            Ok(reply) => reply,
            Err(e) => return AttemptOutcome::TransientFailure(AttemptError::Session(e)),
        };

        match reply.response.err().class() {
            StatusClass::Ok => AttemptOutcome::Success(reply.response),
            StatusClass::Forward => AttemptOutcome::Redirect(reply.forward_to),
            StatusClass::Transient => AttemptOutcome::TransientFailure(AttemptError::Unavailable {
                endpoint: endpoint.clone(),
                code: reply.response.err().clone(),
                hint_message: reply.response.hint_message().to_string(),
            }),
            StatusClass::Application => AttemptOutcome::TerminalFailure(reply.response),
        }
    }
}

/// Authoritative response of a dispatched operation
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    /// The decoded response; its status may still be an application error
    pub response: AdminResponse,
    /// Replica that produced the response
    pub endpoint: Endpoint,
    pub attempts: u32,
}

/// Drives an [`Operation`] to exactly one final outcome.
///
/// Cheap to share: wrap in an `Arc` and call [`dispatch`](Dispatcher::dispatch)
/// from as many tasks as needed. All of them read and update the same leader
/// hint in the [`SessionPool`].
#[derive(Debug)]
pub struct Dispatcher {
    pool: Arc<SessionPool>,
    policy: RetryPolicy,
}

/// Mutable state of one dispatch
struct Attempt {
    endpoint: Endpoint,
    visited: HashSet<Endpoint>,
    round: u32,
    last_error: Option<AttemptError>,
}

impl Dispatcher {
    pub fn new(pool: Arc<SessionPool>, policy: RetryPolicy) -> Result<Self, ConnectError> {
        policy.validate()?;
        Ok(Self { pool, policy })
    }

    pub fn pool(&self) -> &Arc<SessionPool> {
        &self.pool
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn dispatch(
        &self,
        op: &Operation,
        ctx: &CallContext,
    ) -> Result<Dispatched, DispatchError> {
        let mut budget = RetryBudget::start(&self.policy, ctx.timeout());
        let mut state = Attempt {
            endpoint: self.pool.current_candidate(),
            visited: HashSet::new(),
            round: 1,
            last_error: None,
        };

        loop {
            if ctx.is_cancelled() {
                return Err(self.cancelled(op, &state, &budget));
            }
            if budget.is_expired() {
                return Err(self.deadline_exceeded(op, state, &budget));
            }

            let attempt = budget.record_attempt();
            let timeout = budget.attempt_timeout();
            let session = self.pool.session_for(&state.endpoint);

            debug!(
                rpc = %op.rpc(),
                endpoint = %state.endpoint,
                attempt,
                round = state.round,
                timeout_ms = timeout.as_millis() as u64,
                "Dispatching attempt"
            );

            let result = tokio::select! {
                biased;
                _ = ctx.cancelled() => return Err(self.cancelled(op, &state, &budget)),
                result = session.call(op, timeout) => result,
            };

            match AttemptOutcome::classify(&state.endpoint, result) {
                AttemptOutcome::Success(response) | AttemptOutcome::TerminalFailure(response) => {
                    self.pool.on_success(&state.endpoint);
                    debug!(
                        rpc = %op.rpc(),
                        endpoint = %state.endpoint,
                        attempt,
                        err = %response.err(),
                        "Operation resolved"
                    );
                    return Ok(Dispatched {
                        response,
                        endpoint: state.endpoint,
                        attempts: attempt,
                    });
                }

                AttemptOutcome::Redirect(hint) => {
                    debug!(
                        rpc = %op.rpc(),
                        endpoint = %state.endpoint,
                        attempt,
                        hint = ?hint.as_ref().map(Endpoint::to_string),
                        "Redirected"
                    );
                    state.visited.insert(state.endpoint.clone());
                    state.last_error = Some(AttemptError::Redirected {
                        endpoint: state.endpoint.clone(),
                        hint: hint.clone(),
                    });

                    if budget.attempts_exhausted() {
                        return Err(self.exhausted(op, state, &budget));
                    }

                    let next = match hint {
                        Some(leader) if !state.visited.contains(&leader) => {
                            self.pool.on_redirect_hint(&leader);
                            Some(leader)
                        }
                        Some(leader) => {
                            debug!(
                                rpc = %op.rpc(),
                                "Redirect cycle: {} was already tried this round",
                                leader
                            );
                            self.pool.advance(&state.endpoint, &state.visited)
                        }
                        None => self.pool.advance(&state.endpoint, &state.visited),
                    };
                    state = self.next_state(op, state, next, &budget)?;
                }

                AttemptOutcome::TransientFailure(error) => {
                    debug!(
                        rpc = %op.rpc(),
                        endpoint = %state.endpoint,
                        attempt,
                        error = %error,
                        "Transient failure"
                    );
                    self.pool.on_failure(&state.endpoint);
                    state.visited.insert(state.endpoint.clone());
                    state.last_error = Some(error);

                    if budget.attempts_exhausted() {
                        return Err(self.exhausted(op, state, &budget));
                    }
                    if budget.is_expired() {
                        return Err(self.deadline_exceeded(op, state, &budget));
                    }

                    let delay = budget.clamp(self.policy.backoff_delay(attempt));
                    tokio::select! {
                        biased;
                        _ = ctx.cancelled() => return Err(self.cancelled(op, &state, &budget)),
                        _ = tokio::time::sleep(delay) => {}
                    }

                    let next = self.pool.advance(&state.endpoint, &state.visited);
                    state = self.next_state(op, state, next, &budget)?;
                }
            }
        }
    }

    /// Move to `next`, or start a new round when the current one is spent
    fn next_state(
        &self,
        op: &Operation,
        mut state: Attempt,
        next: Option<Endpoint>,
        budget: &RetryBudget,
    ) -> Result<Attempt, DispatchError> {
        if let Some(endpoint) = next {
            state.endpoint = endpoint;
            return Ok(state);
        }

        if state.round >= self.policy.max_rounds {
            let endpoint = state.endpoint;
            let rounds = state.round;
            let last_error = match state.last_error {
                Some(e) => e,
                None => AttemptError::Redirected {
                    endpoint: endpoint.clone(),
                    hint: None,
                },
            };
            warn!(
                rpc = %op.rpc(),
                endpoint = %endpoint,
                attempts = budget.attempts(),
                rounds,
                "No endpoint answered authoritatively"
            );
            return Err(DispatchError::NoAuthoritativeEndpoint {
                endpoint,
                attempts: budget.attempts(),
                rounds,
                last_error,
            });
        }

        let just_tried = HashSet::from([state.endpoint.clone()]);
        let restart = self
            .pool
            .advance(&state.endpoint, &just_tried)
            .unwrap_or_else(|| state.endpoint.clone());

        state.round += 1;
        state.visited.clear();
        debug!(
            rpc = %op.rpc(),
            round = state.round,
            endpoint = %restart,
            "Starting new round"
        );
        state.endpoint = restart;
        Ok(state)
    }

    fn exhausted(&self, op: &Operation, state: Attempt, budget: &RetryBudget) -> DispatchError {
        warn!(
            rpc = %op.rpc(),
            endpoint = %state.endpoint,
            attempts = budget.attempts(),
            "Retry attempts exhausted"
        );
        let last_error = match state.last_error {
            Some(e) => e,
            None => AttemptError::Redirected {
                endpoint: state.endpoint.clone(),
                hint: None,
            },
        };
        DispatchError::Exhausted {
            endpoint: state.endpoint,
            attempts: budget.attempts(),
            last_error,
        }
    }

    fn deadline_exceeded(
        &self,
        op: &Operation,
        state: Attempt,
        budget: &RetryBudget,
    ) -> DispatchError {
        warn!(
            rpc = %op.rpc(),
            endpoint = %state.endpoint,
            attempts = budget.attempts(),
            elapsed_ms = budget.elapsed().as_millis() as u64,
            "Deadline exceeded"
        );
        DispatchError::DeadlineExceeded {
            endpoint: state.endpoint,
            attempts: budget.attempts(),
            deadline: budget.window(),
            last_error: state.last_error,
        }
    }

    fn cancelled(&self, op: &Operation, state: &Attempt, budget: &RetryBudget) -> DispatchError {
        debug!(rpc = %op.rpc(), attempts = budget.attempts(), "Cancelled by caller");
        DispatchError::Cancelled {
            endpoint: (budget.attempts() > 0).then(|| state.endpoint.clone()),
            attempts: budget.attempts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use meta_admin_proto::{ErrorCode, RpcCode};

    fn ep(s: &str) -> Endpoint {
        s.parse().unwrap()
    }

    fn reply(code: ErrorCode, forward_to: Option<Endpoint>) -> Result<Reply, SessionError> {
        Ok(Reply {
            response: AdminResponse::status_only(RpcCode::CreateApp, code),
            forward_to,
        })
    }

    #[test]
    fn test_classify_by_status_class() {
        let m1 = ep("m1:1");

        assert!(matches!(
            AttemptOutcome::classify(&m1, reply(ErrorCode::OK, None)),
            AttemptOutcome::Success(_)
        ));
        assert!(matches!(
            AttemptOutcome::classify(&m1, reply(ErrorCode::APP_EXIST, None)),
            AttemptOutcome::TerminalFailure(_)
        ));
        assert!(matches!(
            AttemptOutcome::classify(&m1, reply(ErrorCode::BUSY, None)),
            AttemptOutcome::TransientFailure(AttemptError::Unavailable { .. })
        ));

        match AttemptOutcome::classify(&m1, reply(ErrorCode::FORWARD_TO_OTHERS, Some(ep("m3:1")))) {
            AttemptOutcome::Redirect(hint) => assert_eq!(hint, Some(ep("m3:1"))),
            other => panic!("expected redirect, got {:?}", other),
        }
    }

    #[test]
    fn test_session_errors_are_transient() {
        let m1 = ep("m1:1");
        let err = SessionError::Connect {
            endpoint: m1.clone(),
            source: TransportError::Closed,
        };
        assert!(matches!(
            AttemptOutcome::classify(&m1, Err(err)),
            AttemptOutcome::TransientFailure(AttemptError::Session(_))
        ));
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let pool = Arc::new(
            SessionPool::new(
                vec![ep("m1:1")],
                Arc::new(crate::transport::TcpTransport::new()),
            )
            .unwrap(),
        );
        let result = Dispatcher::new(pool, RetryPolicy::default().with_max_attempts(0));
        assert!(matches!(result, Err(ConnectError::Policy(_))));
    }
}
