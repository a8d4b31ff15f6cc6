//! Cross-cluster duplication management

use crate::code::ErrorCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DuplicationStatus {
    #[default]
    Init,
    Prepare,
    App,
    Log,
    Pause,
    Removed,
}

/// What a duplication does when it cannot ship a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DuplicationFailMode {
    #[default]
    Slow,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DuplicationEntry {
    pub dupid: i32,
    pub status: DuplicationStatus,
    pub remote: String,
    pub create_ts: i64,
    /// Confirmed decree per partition index
    #[serde(default)]
    pub progress: BTreeMap<i32, i64>,
    #[serde(default)]
    pub fail_mode: DuplicationFailMode,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DuplicationAddRequest {
    pub app_name: String,
    pub remote_cluster_name: String,
    #[serde(default)]
    pub is_duplicating_checkpoint: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DuplicationAddResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default)]
    pub app_id: i32,
    #[serde(default)]
    pub dupid: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DuplicationModifyRequest {
    pub app_name: String,
    pub dupid: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DuplicationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_mode: Option<DuplicationFailMode>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DuplicationModifyResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default)]
    pub app_id: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DuplicationQueryRequest {
    pub app_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DuplicationQueryResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default)]
    pub app_id: i32,
    #[serde(default)]
    pub entry_list: Vec<DuplicationEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_map_survives_json() {
        let mut entry = DuplicationEntry {
            dupid: 1_700_000_000,
            status: DuplicationStatus::Log,
            remote: "backup-cluster".into(),
            ..Default::default()
        };
        entry.progress.insert(0, 120);
        entry.progress.insert(1, 98);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["progress"]["1"], 98);

        let back: DuplicationEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back.progress.get(&0), Some(&120));
    }
}
