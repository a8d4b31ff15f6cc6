//! Cluster-wide calls: node listing, cluster info, meta level and balancer proposals

use crate::code::ErrorCode;
use crate::Endpoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Global partition id: `<app_id>.<partition_index>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Gpid {
    pub app_id: i32,
    pub partition_index: i32,
}

impl Gpid {
    pub fn new(app_id: i32, partition_index: i32) -> Self {
        Self {
            app_id,
            partition_index,
        }
    }
}

impl fmt::Display for Gpid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.app_id, self.partition_index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeStatus {
    #[default]
    Invalid,
    Alive,
    Unalive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub status: NodeStatus,
    pub node: Endpoint,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListNodesRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListNodesResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default)]
    pub infos: Vec<NodeInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusterInfoRequest {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusterInfoResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub values: Vec<String>,
}

impl ClusterInfoResponse {
    /// Iterate over `(key, value)` pairs; unmatched trailing entries are dropped
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys
            .iter()
            .zip(self.values.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Function level of the metadata service (how much it is allowed to do on its own)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetaFunctionLevel {
    Stopped,
    Blind,
    Freezed,
    #[default]
    Steady,
    Lively,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetaControlRequest {
    /// New level; `None` only queries the current one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<MetaFunctionLevel>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetaControlResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
    #[serde(default)]
    pub old_level: MetaFunctionLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalKind {
    AssignPrimary,
    UpgradeToPrimary,
    AddSecondary,
    UpgradeToSecondary,
    DowngradeToSecondary,
    DowngradeToInactive,
    Remove,
}

/// One step of a manual rebalance: apply `kind` for `node` on `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalAction {
    pub target: Endpoint,
    pub node: Endpoint,
    pub kind: ProposalKind,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BalanceRequest {
    pub gpid: Gpid,
    #[serde(default)]
    pub action_list: Vec<ProposalAction>,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub err: ErrorCode,
    #[serde(default)]
    pub hint_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpid_display() {
        assert_eq!(Gpid::new(3, 7).to_string(), "3.7");
    }

    #[test]
    fn test_cluster_info_lookup() {
        let resp = ClusterInfoResponse {
            keys: vec!["meta_servers".into(), "primary_meta_server".into()],
            values: vec!["m1:1,m2:2".into(), "m2:2".into()],
            ..Default::default()
        };
        assert_eq!(resp.get("primary_meta_server"), Some("m2:2"));
        assert_eq!(resp.get("missing"), None);
        assert_eq!(resp.entries().count(), 2);
    }

    #[test]
    fn test_enum_wire_names() {
        let json = serde_json::to_string(&ProposalKind::DowngradeToInactive).unwrap();
        assert_eq!(json, "\"DOWNGRADE_TO_INACTIVE\"");
        let level: MetaFunctionLevel = serde_json::from_str("\"LIVELY\"").unwrap();
        assert_eq!(level, MetaFunctionLevel::Lively);
    }
}
