//! Uniform sum types over every admin RPC
//!
//! Instead of one bespoke argument/result pair per remote procedure, each RPC
//! is a variant of [`RpcCode`], [`AdminRequest`] and [`AdminResponse`]. The
//! typed request structs implement [`AdminRpc`], which ties them to their
//! identifier and response type so callers stay fully typed.

use crate::code::ErrorCode;
use crate::error::ProtoError;
use crate::messages::*;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Status accessors shared by every response type
pub trait MetaResponse {
    fn err(&self) -> &ErrorCode;
    fn hint_message(&self) -> &str;
}

/// A typed admin request that knows its RPC identifier and response type
pub trait AdminRpc: Into<AdminRequest> {
    type Response: MetaResponse;

    const CODE: RpcCode;

    /// Take the typed response out of a decoded [`AdminResponse`]
    fn extract(response: AdminResponse) -> Option<Self::Response>;
}

macro_rules! admin_rpcs {
    ($($variant:ident => $name:literal, $req:ty, $resp:ty;)+) => {
        /// Identifier of one admin RPC
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum RpcCode {
            $($variant,)+
        }

        impl RpcCode {
            pub const ALL: &'static [RpcCode] = &[$(RpcCode::$variant,)+];

            /// Wire name, e.g. `RPC_CM_CREATE_APP`
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(RpcCode::$variant => $name,)+
                }
            }
        }

        impl FromStr for RpcCode {
            type Err = ProtoError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(RpcCode::$variant),)+
                    other => Err(ProtoError::UnknownRpc(other.to_string())),
                }
            }
        }

        /// A request to any admin RPC
        #[derive(Debug, Clone, PartialEq)]
        pub enum AdminRequest {
            $($variant($req),)+
        }

        impl AdminRequest {
            pub fn rpc(&self) -> RpcCode {
                match self {
                    $(AdminRequest::$variant(_) => RpcCode::$variant,)+
                }
            }

            /// Encode the request payload for a frame body
            pub fn to_body(&self) -> Result<Value, ProtoError> {
                match self {
                    $(AdminRequest::$variant(req) => serde_json::to_value(req),)+
                }
                .map_err(ProtoError::Encode)
            }

            /// Decode a frame body sent for `rpc`
            pub fn decode(rpc: RpcCode, body: Value) -> Result<Self, ProtoError> {
                match rpc {
                    $(RpcCode::$variant => serde_json::from_value(body).map(AdminRequest::$variant),)+
                }
                .map_err(|source| ProtoError::Decode { rpc, source })
            }
        }

        /// A decoded response from any admin RPC
        #[derive(Debug, Clone, PartialEq)]
        pub enum AdminResponse {
            $($variant($resp),)+
        }

        impl AdminResponse {
            pub fn rpc(&self) -> RpcCode {
                match self {
                    $(AdminResponse::$variant(_) => RpcCode::$variant,)+
                }
            }

            /// Decode a frame body received for `rpc`
            pub fn decode(rpc: RpcCode, body: Value) -> Result<Self, ProtoError> {
                match rpc {
                    $(RpcCode::$variant => serde_json::from_value(body).map(AdminResponse::$variant),)+
                }
                .map_err(|source| ProtoError::Decode { rpc, source })
            }

            pub fn to_body(&self) -> Result<Value, ProtoError> {
                match self {
                    $(AdminResponse::$variant(resp) => serde_json::to_value(resp),)+
                }
                .map_err(ProtoError::Encode)
            }

            /// A response for `rpc` carrying only a status code, every other field defaulted
            pub fn status_only(rpc: RpcCode, err: ErrorCode) -> Self {
                match rpc {
                    $(RpcCode::$variant => AdminResponse::$variant(<$resp>::default()),)+
                }
                .with_status(err)
            }

            fn with_status(mut self, err: ErrorCode) -> Self {
                match &mut self {
                    $(AdminResponse::$variant(resp) => resp.err = err,)+
                }
                self
            }

            pub fn err(&self) -> &ErrorCode {
                match self {
                    $(AdminResponse::$variant(resp) => resp.err(),)+
                }
            }

            pub fn hint_message(&self) -> &str {
                match self {
                    $(AdminResponse::$variant(resp) => resp.hint_message(),)+
                }
            }
        }

        $(
            impl From<$req> for AdminRequest {
                fn from(req: $req) -> Self {
                    AdminRequest::$variant(req)
                }
            }

            impl AdminRpc for $req {
                type Response = $resp;

                const CODE: RpcCode = RpcCode::$variant;

                fn extract(response: AdminResponse) -> Option<$resp> {
                    match response {
                        AdminResponse::$variant(resp) => Some(resp),
                        _ => None,
                    }
                }
            }
        )+
    };
}

macro_rules! meta_responses {
    ($($resp:ty),+ $(,)?) => {
        $(
            impl MetaResponse for $resp {
                fn err(&self) -> &ErrorCode {
                    &self.err
                }

                fn hint_message(&self) -> &str {
                    &self.hint_message
                }
            }
        )+
    };
}

admin_rpcs! {
    CreateApp => "RPC_CM_CREATE_APP", CreateAppRequest, CreateAppResponse;
    DropApp => "RPC_CM_DROP_APP", DropAppRequest, DropAppResponse;
    RecallApp => "RPC_CM_RECALL_APP", RecallAppRequest, RecallAppResponse;
    ListApps => "RPC_CM_LIST_APPS", ListAppsRequest, ListAppsResponse;
    QueryAppInfo => "RPC_QUERY_APP_INFO", QueryAppInfoRequest, QueryAppInfoResponse;
    UpdateAppEnv => "RPC_CM_UPDATE_APP_ENV", UpdateAppEnvRequest, UpdateAppEnvResponse;
    QueryDuplication => "RPC_CM_QUERY_DUPLICATION", DuplicationQueryRequest, DuplicationQueryResponse;
    ModifyDuplication => "RPC_CM_MODIFY_DUPLICATION", DuplicationModifyRequest, DuplicationModifyResponse;
    AddDuplication => "RPC_CM_ADD_DUPLICATION", DuplicationAddRequest, DuplicationAddResponse;
    ListNodes => "RPC_CM_LIST_NODES", ListNodesRequest, ListNodesResponse;
    QueryClusterInfo => "RPC_CM_CLUSTER_INFO", ClusterInfoRequest, ClusterInfoResponse;
    MetaControl => "RPC_CM_CONTROL_META", MetaControlRequest, MetaControlResponse;
    Balance => "RPC_CM_PROPOSE_BALANCER", BalanceRequest, BalanceResponse;
    QueryBackupPolicy => "RPC_CM_QUERY_BACKUP_POLICY", QueryBackupPolicyRequest, QueryBackupPolicyResponse;
    StartBackupApp => "RPC_CM_START_BACKUP_APP", StartBackupAppRequest, StartBackupAppResponse;
    QueryBackupStatus => "RPC_CM_QUERY_BACKUP_STATUS", QueryBackupStatusRequest, QueryBackupStatusResponse;
    RestoreApp => "RPC_CM_START_RESTORE", RestoreAppRequest, CreateAppResponse;
    StartPartitionSplit => "RPC_CM_START_PARTITION_SPLIT", StartPartitionSplitRequest, StartPartitionSplitResponse;
    QuerySplitStatus => "RPC_CM_QUERY_PARTITION_SPLIT", QuerySplitRequest, QuerySplitResponse;
    ControlPartitionSplit => "RPC_CM_CONTROL_PARTITION_SPLIT", ControlSplitRequest, ControlSplitResponse;
    StartBulkLoad => "RPC_CM_START_BULK_LOAD", StartBulkLoadRequest, StartBulkLoadResponse;
    QueryBulkLoadStatus => "RPC_CM_QUERY_BULK_LOAD_STATUS", QueryBulkLoadRequest, QueryBulkLoadResponse;
    ControlBulkLoad => "RPC_CM_CONTROL_BULK_LOAD", ControlBulkLoadRequest, ControlBulkLoadResponse;
    ClearBulkLoad => "RPC_CM_CLEAR_BULK_LOAD", ClearBulkLoadStateRequest, ClearBulkLoadStateResponse;
    StartManualCompact => "RPC_CM_START_MANUAL_COMPACT", StartManualCompactRequest, StartManualCompactResponse;
    QueryManualCompact => "RPC_CM_QUERY_MANUAL_COMPACT_STATUS", QueryManualCompactRequest, QueryManualCompactResponse;
}

meta_responses!(
    CreateAppResponse,
    DropAppResponse,
    RecallAppResponse,
    ListAppsResponse,
    QueryAppInfoResponse,
    UpdateAppEnvResponse,
    DuplicationQueryResponse,
    DuplicationModifyResponse,
    DuplicationAddResponse,
    ListNodesResponse,
    ClusterInfoResponse,
    MetaControlResponse,
    BalanceResponse,
    QueryBackupPolicyResponse,
    StartBackupAppResponse,
    QueryBackupStatusResponse,
    StartPartitionSplitResponse,
    QuerySplitResponse,
    ControlSplitResponse,
    StartBulkLoadResponse,
    QueryBulkLoadResponse,
    ControlBulkLoadResponse,
    ClearBulkLoadStateResponse,
    StartManualCompactResponse,
    QueryManualCompactResponse,
);

impl fmt::Display for RpcCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RpcCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RpcCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rpc_names_are_unique_and_parse_back() {
        let names: HashSet<&str> = RpcCode::ALL.iter().map(RpcCode::as_str).collect();
        assert_eq!(names.len(), RpcCode::ALL.len());
        assert_eq!(RpcCode::ALL.len(), 26);

        for code in RpcCode::ALL {
            assert_eq!(code.as_str().parse::<RpcCode>().unwrap(), *code);
        }
        assert!(matches!(
            "RPC_CM_NOPE".parse::<RpcCode>(),
            Err(ProtoError::UnknownRpc(_))
        ));
    }

    #[test]
    fn test_request_knows_its_code() {
        let req: AdminRequest = CreateAppRequest::new("temp", 4).into();
        assert_eq!(req.rpc(), RpcCode::CreateApp);
        assert_eq!(CreateAppRequest::CODE, RpcCode::CreateApp);
        assert_eq!(RestoreAppRequest::CODE.as_str(), "RPC_CM_START_RESTORE");
    }

    #[test]
    fn test_restore_shares_create_response_shape() {
        let body = serde_json::json!({"err": "ERR_OK", "app_id": 12});
        let resp = AdminResponse::decode(RpcCode::RestoreApp, body).unwrap();
        assert_eq!(resp.rpc(), RpcCode::RestoreApp);

        let typed = RestoreAppRequest::extract(resp.clone()).unwrap();
        assert_eq!(typed.app_id, 12);
        assert!(CreateAppRequest::extract(resp).is_none());
    }

    #[test]
    fn test_status_only_sets_err_for_every_rpc() {
        for code in RpcCode::ALL {
            let resp = AdminResponse::status_only(*code, ErrorCode::FORWARD_TO_OTHERS);
            assert_eq!(resp.rpc(), *code);
            assert_eq!(resp.err(), &ErrorCode::FORWARD_TO_OTHERS);

            let body = resp.to_body().unwrap();
            let back = AdminResponse::decode(*code, body).unwrap();
            assert_eq!(back, resp);
        }
    }

    #[test]
    fn test_decode_failure_names_rpc() {
        let err = AdminResponse::decode(RpcCode::ListNodes, serde_json::json!({"infos": 3}))
            .unwrap_err();
        assert!(err.to_string().contains("RPC_CM_LIST_NODES"));
    }
}
