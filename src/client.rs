/*!
 * MetaAdminClient: one async wrapper per admin RPC
 */

use meta_admin_connect::{
    CallContext, Dispatcher, SessionPool, SessionStats, TcpTransport, Transport,
};
use meta_admin_proto::*;
use meta_admin_resilience::RetryPolicy;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{AdminError, AdminResult, ConfigError};

/// Administrative client for a replicated metadata service.
///
/// Every wrapper sends its request to the current leader, following
/// redirects and retrying transient failures on other replicas. A response
/// whose status is not `ERR_OK` comes back as [`AdminError::Rejected`] with
/// the full response attached.
///
/// Cloning is cheap; clones share sessions and the leader hint.
///
/// # Example
///
/// ```no_run
/// use meta_admin::{CallContext, ClientConfig, MetaAdminClient};
/// use meta_admin::proto::CreateAppRequest;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::new(["10.0.0.1:34601", "10.0.0.2:34601"]);
/// let client = MetaAdminClient::new(&config)?;
///
/// let ctx = CallContext::new().with_timeout(Duration::from_secs(10));
/// let created = client.create_app(&ctx, CreateAppRequest::new("orders", 8)).await?;
/// println!("created table with id {}", created.app_id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MetaAdminClient {
    dispatcher: Arc<Dispatcher>,
}

macro_rules! admin_wrappers {
    ($($(#[$doc:meta])* fn $name:ident($req:ty) -> $resp:ty;)+) => {
        impl MetaAdminClient {
            $(
                $(#[$doc])*
                pub async fn $name(&self, ctx: &CallContext, request: $req) -> AdminResult<$resp> {
                    self.invoke(ctx, request).await
                }
            )+
        }
    };
}

impl MetaAdminClient {
    /// Build a client over TCP from configuration
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::with_transport(
            config.endpoints()?,
            config.retry_policy(),
            Arc::new(TcpTransport::new()),
        )
    }

    /// Build a client over an arbitrary transport
    pub fn with_transport(
        endpoints: Vec<Endpoint>,
        policy: RetryPolicy,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        let pool = SessionPool::new(endpoints, transport)?;
        let dispatcher = Dispatcher::new(Arc::new(pool), policy)?;

        info!(
            "Meta admin client ready ({} endpoints, max {} attempts)",
            dispatcher.pool().endpoints().len(),
            dispatcher.policy().max_attempts
        );

        Ok(Self {
            dispatcher: Arc::new(dispatcher),
        })
    }

    /// Send any typed request and map its status to a result
    pub async fn invoke<Q>(&self, ctx: &CallContext, request: Q) -> AdminResult<Q::Response>
    where
        Q: AdminRpc,
    {
        let operation = Q::CODE;
        let op = meta_admin_connect::Operation::new(request)?;

        let dispatched = self
            .dispatcher
            .dispatch(&op, ctx)
            .await
            .map_err(|source| AdminError::Dispatch { operation, source })?;

        let endpoint = dispatched.endpoint;
        let response =
            Q::extract(dispatched.response).ok_or(AdminError::UnexpectedResponse { operation })?;

        let code = response.err().clone();
        if code.is_ok() {
            debug!(rpc = %operation, endpoint = %endpoint, "Admin call succeeded");
            return Ok(response);
        }

        debug!(rpc = %operation, endpoint = %endpoint, code = %code, "Admin call rejected");
        Err(AdminError::Rejected {
            operation,
            code,
            hint: response.hint_message().to_string(),
            response: Box::new(response),
        })
    }

    /// Current leader hint, if any replica has been identified as leader
    pub fn leader_hint(&self) -> Option<Endpoint> {
        self.dispatcher.pool().leader_hint()
    }

    /// Configured replicas in round-robin order
    pub fn endpoints(&self) -> &[Endpoint] {
        self.dispatcher.pool().endpoints()
    }

    pub fn session_stats(&self) -> Vec<SessionStats> {
        self.dispatcher.pool().session_stats()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        self.dispatcher.policy()
    }

    /// Close all connections. The client stays usable and reconnects lazily.
    pub fn close(&self) {
        self.dispatcher.pool().close_all();
    }
}

admin_wrappers! {
    /// Create a table. Answers `ERR_APP_EXIST` when the name is taken.
    fn create_app(CreateAppRequest) -> CreateAppResponse;

    /// Drop a table. It stays recallable for the reserve period.
    fn drop_app(DropAppRequest) -> DropAppResponse;

    fn recall_app(RecallAppRequest) -> RecallAppResponse;

    /// List tables, optionally filtered by status
    fn list_apps(ListAppsRequest) -> ListAppsResponse;

    /// Table descriptor plus the replica layout of every partition
    fn query_app_info(QueryAppInfoRequest) -> QueryAppInfoResponse;

    fn update_app_env(UpdateAppEnvRequest) -> UpdateAppEnvResponse;

    fn query_duplication(DuplicationQueryRequest) -> DuplicationQueryResponse;

    fn modify_duplication(DuplicationModifyRequest) -> DuplicationModifyResponse;

    /// Start duplicating a table to a remote cluster
    fn add_duplication(DuplicationAddRequest) -> DuplicationAddResponse;

    /// List replica nodes, optionally filtered by status
    fn list_nodes(ListNodesRequest) -> ListNodesResponse;

    /// Cluster-wide key/value summary (meta servers, primary meta, ...)
    fn query_cluster_info(ClusterInfoRequest) -> ClusterInfoResponse;

    /// Read or change the meta function level. Without a level the current
    /// one is returned unchanged.
    fn meta_control(MetaControlRequest) -> MetaControlResponse;

    /// Propose replica moves for one partition
    fn balance(BalanceRequest) -> BalanceResponse;

    fn query_backup_policy(QueryBackupPolicyRequest) -> QueryBackupPolicyResponse;

    fn start_backup_app(StartBackupAppRequest) -> StartBackupAppResponse;

    fn query_backup_status(QueryBackupStatusRequest) -> QueryBackupStatusResponse;

    /// Restore a table from backup; answered like a create
    fn restore_app(RestoreAppRequest) -> CreateAppResponse;

    /// Double the partition count of a table
    fn start_partition_split(StartPartitionSplitRequest) -> StartPartitionSplitResponse;

    fn query_split_status(QuerySplitRequest) -> QuerySplitResponse;

    fn control_partition_split(ControlSplitRequest) -> ControlSplitResponse;

    fn start_bulk_load(StartBulkLoadRequest) -> StartBulkLoadResponse;

    fn query_bulk_load_status(QueryBulkLoadRequest) -> QueryBulkLoadResponse;

    /// Pause, restart or cancel a running bulk load
    fn control_bulk_load(ControlBulkLoadRequest) -> ControlBulkLoadResponse;

    fn clear_bulk_load(ClearBulkLoadStateRequest) -> ClearBulkLoadStateResponse;

    fn start_manual_compact(StartManualCompactRequest) -> StartManualCompactResponse;

    fn query_manual_compact(QueryManualCompactRequest) -> QueryManualCompactResponse;
}
