//! Meta Admin Connect: leader-aware dispatch of admin RPCs
//!
//! The metadata service is replicated and only its current leader answers
//! admin requests. Followers reply `ERR_FORWARD_TO_OTHERS`, usually naming the
//! leader. This crate hides that from callers.
//!
//! # Architecture
//!
//! - **Transport / Connection**: the seam to the network; [`TcpTransport`] ships
//!   length-delimited JSON frames over TCP
//! - **Session**: one lazily reconnected connection per replica
//! - **SessionPool**: session cache plus the shared leader hint
//! - **Operation**: an immutable, pre-encoded request
//! - **Dispatcher**: retries an operation across replicas until it resolves
//!
//! # Example
//!
//! ```rust,no_run
//! use meta_admin_connect::{CallContext, Dispatcher, Operation, SessionPool, TcpTransport};
//! use meta_admin_proto::{Endpoint, ListAppsRequest};
//! use meta_admin_resilience::RetryPolicy;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let endpoints: Vec<Endpoint> = vec!["10.0.0.1:34601".parse()?, "10.0.0.2:34601".parse()?];
//! let pool = Arc::new(SessionPool::new(endpoints, Arc::new(TcpTransport::new()))?);
//! let dispatcher = Dispatcher::new(pool, RetryPolicy::default())?;
//!
//! let op = Operation::new(ListAppsRequest::default())?;
//! let outcome = dispatcher.dispatch(&op, &CallContext::new()).await?;
//! println!("{} answered after {} attempts", outcome.endpoint, outcome.attempts);
//! # Ok(())
//! # }
//! ```

pub mod dispatcher;
pub mod error;
pub mod operation;
pub mod pool;
pub mod session;
pub mod transport;

pub use dispatcher::{AttemptOutcome, Dispatched, Dispatcher};
pub use error::{AttemptError, ConnectError, DispatchError, SessionError, TransportError};
pub use operation::{CallContext, Operation};
pub use pool::SessionPool;
pub use session::{Reply, Session, SessionStats};
pub use transport::{frame_codec, Connection, TcpTransport, Transport};
