/*!
 * Meta Admin: leader-aware administrative client for a replicated metadata service
 *
 * The service elects one leader among its replicas and only that leader
 * answers administrative calls (create/drop tables, list nodes, backups,
 * bulk loads, partition splits, manual compaction, ...). Followers forward
 * callers to the leader, and leadership moves when replicas fail.
 *
 * `MetaAdminClient` hides all of this: every wrapper takes a `CallContext`
 * and a typed request and returns the typed response, following redirects
 * and retrying transient failures within a bounded `RetryPolicy`.
 *
 * The building blocks live in their own crates:
 * - `meta-admin-proto`: endpoints, status codes, messages and wire frames
 * - `meta-admin-resilience`: retry policy, backoff and budget
 * - `meta-admin-connect`: sessions, session pool, leader hint and dispatcher
 */

pub mod client;
pub mod config;
pub mod error;
pub mod logging;

pub use client::MetaAdminClient;
pub use config::{ClientConfig, LogLevel, LoggingConfig, RetryConfig};
pub use error::{AdminError, AdminResult, ConfigError};
pub use logging::init_logging;

pub use meta_admin_connect::{CallContext, DispatchError};
pub use meta_admin_resilience::RetryPolicy;
pub use tokio_util::sync::CancellationToken;

/// Request, response and status types
pub use meta_admin_proto as proto;

/// Transport seam, for custom transports and inspection
pub use meta_admin_connect as connect;
