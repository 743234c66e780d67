//! Pieces shared by many Elasticsearch responses.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::ErrorDetails;

/// The `_shards` header found in most write and maintenance responses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShardsInfo {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ShardOperationFailedException>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShardOperationFailedException {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorDetails>,
}

/// Response of the many endpoints that only acknowledge a cluster state change.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AcknowledgedResponse {
    pub acknowledged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shards_acknowledged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

/// The `_nodes` header of node level responses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NodesInfo {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ErrorDetails>,
}

/// Routing entry of a shard copy, as reported by search shards or synced flush.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShardRouting {
    pub state: String,
    pub primary: bool,
    pub node: Option<String>,
    pub relocating_node: Option<String>,
    pub shard: u32,
    pub index: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_shard_size_in_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_source: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unassigned_info: Option<HashMap<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation_id: Option<AllocationId>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AllocationId {
    pub id: String,
}
