use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::api::{strings, CommonParams};
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Detailed progress of snapshots, see [`Client::snapshot_status`].
///
/// Without a repository, reports the snapshots currently running.
#[derive(Debug, Clone)]
pub struct SnapshotStatusService {
    client: Client,
    common: CommonParams,
    repository: Option<String>,
    snapshots: Vec<String>,
    master_timeout: Option<String>,
    ignore_unavailable: Option<bool>,
}

impl SnapshotStatusService {
    pub(crate) fn new(client: Client) -> Self {
        SnapshotStatusService {
            client,
            common: CommonParams::default(),
            repository: None,
            snapshots: Vec::new(),
            master_timeout: None,
            ignore_unavailable: None,
        }
    }

    common_setters!();

    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn snapshot<I, S>(mut self, snapshots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.snapshots.extend(strings(snapshots));
        self
    }

    pub fn master_timeout(mut self, master_timeout: impl Into<String>) -> Self {
        self.master_timeout = Some(master_timeout.into());
        self
    }

    pub fn ignore_unavailable(mut self, ignore_unavailable: bool) -> Self {
        self.ignore_unavailable = Some(ignore_unavailable);
        self
    }

    /// Snapshot names are ignored when no repository is set.
    pub fn build_url(&self) -> (String, Params) {
        let url = match &self.repository {
            Some(repository) if !self.snapshots.is_empty() => format!(
                "/_snapshot/{}/{}/_status",
                path::encode(repository),
                path::encode_list(&self.snapshots)
            ),
            Some(repository) => format!("/_snapshot/{}/_status", path::encode(repository)),
            None => String::from("/_snapshot/_status"),
        };
        let mut params = self.common.params();
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_opt("ignore_unavailable", &self.ignore_unavailable);
        (url, params)
    }

    pub async fn send(&self, ctx: &Context) -> Result<SnapshotStatusResponse, Error> {
        let (url, params) = self.build_url();
        let request = Request::new(Method::GET, url)
            .params(params)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotStatusResponse {
    pub snapshots: Vec<SnapshotStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotStatus {
    pub snapshot: String,
    pub repository: String,
    pub uuid: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_global_state: Option<bool>,
    pub shards_stats: SnapshotShardsStats,
    pub stats: SnapshotStats,
    pub indices: HashMap<String, SnapshotIndexStatus>,
}

/// Shard counts by stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotShardsStats {
    pub initializing: u32,
    pub started: u32,
    pub finalizing: u32,
    pub done: u32,
    pub failed: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotStats {
    pub incremental: SnapshotFileStats,
    pub processed: SnapshotFileStats,
    pub total: SnapshotFileStats,
    pub start_time_in_millis: i64,
    pub time_in_millis: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotFileStats {
    pub file_count: i64,
    pub size_in_bytes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotIndexStatus {
    pub shards_stats: SnapshotShardsStats,
    pub stats: SnapshotStats,
}
