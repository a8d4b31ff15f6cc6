//! Backup policies, one-off backups and restore

use crate::code::ErrorCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub policy_name: String,
    pub backup_provider_type: String,
    pub backup_interval_seconds: i64,
    #[serde(default)]
    pub app_ids: BTreeSet<i32>,
    pub backup_history_count_to_keep: i32,
    /// Daily start time, `HH:MM`
    pub start_time: String,
    #[serde(default)]
    pub is_disable: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BackupEntry {
    pub backup_id: i64,
    pub start_time_ms: i64,
    pub end_time_ms: i64,
    #[serde(default)]
    pub app_ids: BTreeSet<i32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryBackupPolicyRequest {
    #[serde(default)]
    pub policy_names: Vec<String>,
    pub backup_info_count: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryBackupPolicyResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default)]
    pub policys: Vec<PolicyEntry>,
    /// One list per entry in `policys`, newest first
    #[serde(default)]
    pub backup_infos: Vec<Vec<BackupEntry>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StartBackupAppRequest {
    pub backup_provider_type: String,
    pub app_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StartBackupAppResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BackupItem {
    pub backup_id: i64,
    pub app_name: String,
    pub backup_provider_type: String,
    #[serde(default)]
    pub backup_path: String,
    pub start_time_ms: i64,
    #[serde(default)]
    pub end_time_ms: i64,
    #[serde(default)]
    pub is_backup_failed: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryBackupStatusRequest {
    pub app_id: i32,
    /// Restrict to one backup; `None` returns every backup of the table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryBackupStatusResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default)]
    pub backup_items: Vec<BackupItem>,
}

/// Restore a table from a backup; answered with a [`CreateAppResponse`](crate::CreateAppResponse)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RestoreAppRequest {
    pub cluster_name: String,
    pub policy_name: String,
    pub time_stamp: i64,
    pub app_name: String,
    pub app_id: i32,
    pub new_app_name: String,
    pub backup_provider_name: String,
    #[serde(default)]
    pub skip_bad_partition: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_path: Option<String>,
}
