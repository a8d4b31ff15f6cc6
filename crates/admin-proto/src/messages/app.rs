//! Table (app) lifecycle: create, drop, recall, list, inspect and env updates

use crate::code::ErrorCode;
use crate::messages::cluster::Gpid;
use crate::Endpoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle state of a table as seen by the metadata service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppStatus {
    #[default]
    Invalid,
    Available,
    Creating,
    Dropping,
    Dropped,
}

/// Table descriptor returned by list/recall/query calls
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppInfo {
    pub status: AppStatus,
    pub app_type: String,
    pub app_name: String,
    pub app_id: i32,
    pub partition_count: i32,
    #[serde(default)]
    pub envs: BTreeMap<String, String>,
    pub is_stateful: bool,
    pub max_replica_count: i32,
    #[serde(default)]
    pub expire_second: i64,
    #[serde(default)]
    pub create_second: i64,
    #[serde(default)]
    pub drop_second: i64,
    #[serde(default)]
    pub duplicating: bool,
}

/// Replica placement of one partition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartitionConfiguration {
    pub pid: Gpid,
    pub ballot: i64,
    pub max_replica_count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<Endpoint>,
    #[serde(default)]
    pub secondaries: Vec<Endpoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAppOptions {
    pub partition_count: i32,
    pub replica_count: i32,
    /// Treat "already exists" as success on the server side
    pub success_if_exist: bool,
    pub app_type: String,
    pub is_stateful: bool,
    #[serde(default)]
    pub envs: BTreeMap<String, String>,
}

impl Default for CreateAppOptions {
    fn default() -> Self {
        Self {
            partition_count: 8,
            replica_count: 3,
            success_if_exist: false,
            app_type: "pegasus".to_string(),
            is_stateful: true,
            envs: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreateAppRequest {
    pub app_name: String,
    pub options: CreateAppOptions,
}

impl CreateAppRequest {
    pub fn new(app_name: impl Into<String>, partition_count: i32) -> Self {
        Self {
            app_name: app_name.into(),
            options: CreateAppOptions {
                partition_count,
                ..Default::default()
            },
        }
    }
}

/// Response to create and restore calls
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreateAppResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default)]
    pub app_id: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DropAppOptions {
    pub success_if_not_exist: bool,
    /// How long the dropped table stays recallable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserve_seconds: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DropAppRequest {
    pub app_name: String,
    pub options: DropAppOptions,
}

impl DropAppRequest {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            options: DropAppOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DropAppResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
}

/// Bring back a dropped table that is still inside its reserve window
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecallAppRequest {
    pub app_id: i32,
    pub new_app_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecallAppResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<AppInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListAppsRequest {
    /// Only list tables in this state; `None` lists everything
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppStatus>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListAppsResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default)]
    pub infos: Vec<AppInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryAppInfoRequest {
    pub app_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryAppInfoResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<AppInfo>,
    #[serde(default)]
    pub partitions: Vec<PartitionConfiguration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppEnvOperation {
    #[default]
    Set,
    Del,
    Clear,
}

/// Set, delete or clear table-level environment variables
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateAppEnvRequest {
    pub app_name: String,
    pub op: AppEnvOperation,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_prefix: Option<String>,
}

impl UpdateAppEnvRequest {
    pub fn set<K, V>(app_name: impl Into<String>, envs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let (keys, values) = envs.into_iter().map(|(k, v)| (k.into(), v.into())).unzip();
        Self {
            app_name: app_name.into(),
            op: AppEnvOperation::Set,
            keys,
            values,
            clear_prefix: None,
        }
    }

    pub fn del<K: Into<String>>(
        app_name: impl Into<String>,
        keys: impl IntoIterator<Item = K>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            op: AppEnvOperation::Del,
            keys: keys.into_iter().map(Into::into).collect(),
            values: Vec::new(),
            clear_prefix: None,
        }
    }

    /// Clear every env key starting with `prefix` (empty prefix clears all)
    pub fn clear(app_name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            op: AppEnvOperation::Clear,
            keys: Vec::new(),
            values: Vec::new(),
            clear_prefix: Some(prefix.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateAppEnvResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
}
