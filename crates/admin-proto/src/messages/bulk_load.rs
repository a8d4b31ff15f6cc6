//! Bulk load: ingest externally generated files into a table

use crate::code::ErrorCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulkLoadStatus {
    #[default]
    Invalid,
    Downloading,
    Downloaded,
    Ingesting,
    Succeed,
    Failed,
    Paused,
    Pausing,
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulkLoadControlType {
    #[default]
    Pause,
    Restart,
    Cancel,
    ForceCancel,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StartBulkLoadRequest {
    pub app_name: String,
    pub cluster_name: String,
    pub file_provider_type: String,
    pub remote_root_path: String,
    #[serde(default)]
    pub ingest_behind: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StartBulkLoadResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryBulkLoadRequest {
    pub app_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryBulkLoadResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub app_status: BulkLoadStatus,
    #[serde(default)]
    pub partitions_status: Vec<BulkLoadStatus>,
    #[serde(default)]
    pub max_replica_count: i32,
    #[serde(default)]
    pub is_bulk_loading: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlBulkLoadRequest {
    pub app_name: String,
    pub control_type: BulkLoadControlType,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlBulkLoadResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
}

/// Remove the bulk load bookkeeping left behind by a finished or failed load
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClearBulkLoadStateRequest {
    pub app_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClearBulkLoadStateResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
}
