//! Partition split

use crate::code::ErrorCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitStatus {
    #[default]
    NotSplit,
    Splitting,
    Pausing,
    Paused,
    Canceling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitControlType {
    #[default]
    Pause,
    Restart,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StartPartitionSplitRequest {
    pub app_name: String,
    /// Must be exactly twice the current partition count
    pub new_partition_count: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StartPartitionSplitResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuerySplitRequest {
    pub app_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuerySplitResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default)]
    pub new_partition_count: i32,
    /// Split state of every parent partition still splitting
    #[serde(default)]
    pub status: BTreeMap<i32, SplitStatus>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlSplitRequest {
    pub app_name: String,
    pub control_type: SplitControlType,
    /// Parent partition to pause/restart; `-1` targets every partition
    pub parent_pidx: i32,
    /// Required when cancelling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_partition_count: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlSplitResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
}
