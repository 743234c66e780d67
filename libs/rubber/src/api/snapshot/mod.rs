//! Snapshot repositories, snapshots and restores.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::domain::model::common::{ShardOperationFailedException, ShardsInfo};

mod create;
mod create_repository;
mod delete;
mod delete_repository;
mod get;
mod get_repository;
mod restore;
mod status;
mod verify_repository;

pub use create::{SnapshotCreateResponse, SnapshotCreateService};
pub use create_repository::SnapshotCreateRepositoryService;
pub use delete::SnapshotDeleteService;
pub use delete_repository::SnapshotDeleteRepositoryService;
pub use get::{SnapshotGetResponse, SnapshotGetService};
pub use get_repository::{
    SnapshotGetRepositoryResponse, SnapshotGetRepositoryService, SnapshotRepositoryMetaData,
};
pub use restore::{RestoreInfo, SnapshotRestoreResponse, SnapshotRestoreService};
pub use status::{
    SnapshotFileStats, SnapshotIndexStatus, SnapshotShardsStats, SnapshotStats, SnapshotStatus,
    SnapshotStatusResponse, SnapshotStatusService,
};
pub use verify_repository::{
    SnapshotVerifyRepositoryNode, SnapshotVerifyRepositoryResponse,
    SnapshotVerifyRepositoryService,
};

/// Description of a snapshot, as returned by create (when waiting for
/// completion) and get.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotInfo {
    pub snapshot: String,
    pub uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub indices: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_streams: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_global_state: Option<bool>,
    /// `IN_PROGRESS`, `SUCCESS`, `PARTIAL`, `FAILED` or `INCOMPATIBLE`.
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_in_millis: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time_in_millis: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_in_millis: Option<i64>,
    pub failures: Vec<ShardOperationFailedException>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shards: Option<ShardsInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}
