//! Manual compaction

use crate::code::ErrorCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StartManualCompactRequest {
    pub app_name: String,
    /// Unix seconds; compaction starts once this time has passed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottommost: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_running_count: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StartManualCompactResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryManualCompactRequest {
    pub app_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryManualCompactResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    /// Percentage complete, absent when no compaction was ever started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
}
