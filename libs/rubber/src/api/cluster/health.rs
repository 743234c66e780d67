use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::api::{strings, CommonParams};
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Reports the health of the cluster, optionally waiting for a state, see
/// [`Client::cluster_health`].
#[derive(Debug, Clone)]
pub struct ClusterHealthService {
    client: Client,
    common: CommonParams,
    index: Vec<String>,
    level: Option<String>,
    local: Option<bool>,
    master_timeout: Option<String>,
    timeout: Option<String>,
    wait_for_active_shards: Option<String>,
    wait_for_nodes: Option<String>,
    wait_for_status: Option<String>,
    wait_for_no_relocating_shards: Option<bool>,
    wait_for_no_initializing_shards: Option<bool>,
}

impl ClusterHealthService {
    pub(crate) fn new(client: Client) -> Self {
        ClusterHealthService {
            client,
            common: CommonParams::default(),
            index: Vec::new(),
            level: None,
            local: None,
            master_timeout: None,
            timeout: None,
            wait_for_active_shards: None,
            wait_for_nodes: None,
            wait_for_status: None,
            wait_for_no_relocating_shards: None,
            wait_for_no_initializing_shards: None,
        }
    }

    common_setters!();

    pub fn index<I, S>(mut self, index: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index.extend(strings(index));
        self
    }

    /// `cluster`, `indices` or `shards`.
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = Some(local);
        self
    }

    pub fn master_timeout(mut self, master_timeout: impl Into<String>) -> Self {
        self.master_timeout = Some(master_timeout.into());
        self
    }

    pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    pub fn wait_for_active_shards(mut self, wait_for_active_shards: impl Into<String>) -> Self {
        self.wait_for_active_shards = Some(wait_for_active_shards.into());
        self
    }

    /// E.g. `>=3`.
    pub fn wait_for_nodes(mut self, wait_for_nodes: impl Into<String>) -> Self {
        self.wait_for_nodes = Some(wait_for_nodes.into());
        self
    }

    pub fn wait_for_status(mut self, wait_for_status: impl Into<String>) -> Self {
        self.wait_for_status = Some(wait_for_status.into());
        self
    }

    pub fn wait_for_green_status(self) -> Self {
        self.wait_for_status("green")
    }

    pub fn wait_for_yellow_status(self) -> Self {
        self.wait_for_status("yellow")
    }

    pub fn wait_for_no_relocating_shards(mut self, wait: bool) -> Self {
        self.wait_for_no_relocating_shards = Some(wait);
        self
    }

    pub fn wait_for_no_initializing_shards(mut self, wait: bool) -> Self {
        self.wait_for_no_initializing_shards = Some(wait);
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = if self.index.is_empty() {
            String::from("/_cluster/health")
        } else {
            format!("/_cluster/health/{}", path::encode_list(&self.index))
        };
        let mut params = self.common.params();
        params.set_opt("level", &self.level);
        params.set_opt("local", &self.local);
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_opt("timeout", &self.timeout);
        params.set_opt("wait_for_active_shards", &self.wait_for_active_shards);
        params.set_opt("wait_for_nodes", &self.wait_for_nodes);
        params.set_opt("wait_for_status", &self.wait_for_status);
        params.set_opt(
            "wait_for_no_relocating_shards",
            &self.wait_for_no_relocating_shards,
        );
        params.set_opt(
            "wait_for_no_initializing_shards",
            &self.wait_for_no_initializing_shards,
        );
        (url, params)
    }

    /// A wait which times out still returns the health, with `timed_out` set.
    pub async fn send(&self, ctx: &Context) -> Result<ClusterHealthResponse, Error> {
        let (url, params) = self.build_url();
        let request = Request::new(Method::GET, url)
            .params(params)
            .headers(self.common.headers.clone())
            .ignore_errors(&[408]);
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterHealthResponse {
    pub cluster_name: String,
    /// `green`, `yellow` or `red`.
    pub status: String,
    pub timed_out: bool,
    pub number_of_nodes: u32,
    pub number_of_data_nodes: u32,
    pub active_primary_shards: u32,
    pub active_shards: u32,
    pub relocating_shards: u32,
    pub initializing_shards: u32,
    pub unassigned_shards: u32,
    pub delayed_unassigned_shards: u32,
    pub number_of_pending_tasks: u32,
    pub number_of_in_flight_fetch: u32,
    pub task_max_waiting_in_queue_millis: u64,
    pub active_shards_percent_as_number: f64,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub indices: HashMap<String, ClusterIndexHealth>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterIndexHealth {
    pub status: String,
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
    pub active_primary_shards: u32,
    pub active_shards: u32,
    pub relocating_shards: u32,
    pub initializing_shards: u32,
    pub unassigned_shards: u32,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub shards: HashMap<String, ClusterShardHealth>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterShardHealth {
    pub status: String,
    pub primary_active: bool,
    pub active_shards: u32,
    pub relocating_shards: u32,
    pub initializing_shards: u32,
    pub unassigned_shards: u32,
}
