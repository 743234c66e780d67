use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::api::{strings, CommonParams};
use crate::client::Client;
use crate::domain::model::common::NodesInfo;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Gathers cluster wide statistics, see [`Client::cluster_stats`].
#[derive(Debug, Clone)]
pub struct ClusterStatsService {
    client: Client,
    common: CommonParams,
    node_id: Vec<String>,
    flat_settings: Option<bool>,
    timeout: Option<String>,
}

impl ClusterStatsService {
    pub(crate) fn new(client: Client) -> Self {
        ClusterStatsService {
            client,
            common: CommonParams::default(),
            node_id: Vec::new(),
            flat_settings: None,
            timeout: None,
        }
    }

    common_setters!();

    /// Restricts the statistics to these nodes.
    pub fn node_id<I, S>(mut self, node_id: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node_id.extend(strings(node_id));
        self
    }

    pub fn flat_settings(mut self, flat_settings: bool) -> Self {
        self.flat_settings = Some(flat_settings);
        self
    }

    pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = if self.node_id.is_empty() {
            String::from("/_cluster/stats")
        } else {
            format!("/_cluster/stats/nodes/{}", path::encode_list(&self.node_id))
        };
        let mut params = self.common.params();
        params.set_opt("flat_settings", &self.flat_settings);
        params.set_opt("timeout", &self.timeout);
        (url, params)
    }

    pub async fn send(&self, ctx: &Context) -> Result<ClusterStatsResponse, Error> {
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
pub struct ClusterStatsResponse {
    #[serde(rename = "_nodes", skip_serializing_if = "Option::is_none")]
    pub nodes_info: Option<NodesInfo>,
    pub cluster_name: String,
    pub cluster_uuid: String,
    pub timestamp: i64,
    pub status: String,
    pub indices: ClusterStatsIndices,
    pub nodes: ClusterStatsNodes,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterStatsIndices {
    pub count: u64,
    pub shards: ClusterStatsIndicesShards,
    pub docs: ClusterStatsIndicesDocs,
    /// Store, fielddata, caches, segments and mappings sections, as sent.
    #[serde(flatten)]
    pub others: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterStatsIndicesShards {
    pub total: u64,
    pub primaries: u64,
    pub replication: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterStatsIndicesDocs {
    pub count: u64,
    pub deleted: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterStatsNodes {
    /// Node counts by role, plus `total`.
    pub count: HashMap<String, u64>,
    pub versions: Vec<String>,
    /// Os, process, jvm, fs, plugins and network sections, as sent.
    #[serde(flatten)]
    pub others: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_decode_stats() {
        let transport = Arc::new(CannedTransport::new().respond(
            200,
            r#"{"_nodes":{"total":1,"successful":1,"failed":0},
                "cluster_name":"elasticsearch","cluster_uuid":"abc","timestamp":1600000000000,
                "status":"green",
                "indices":{"count":2,"shards":{"total":4,"primaries":4,"replication":0.0},
                           "docs":{"count":10,"deleted":1},"store":{"size_in_bytes":1024}},
                "nodes":{"count":{"total":1,"data":1,"master":1},"versions":["7.10.0"],
                         "jvm":{"max_uptime_in_millis":1000}}}"#,
        ));
        let client = Client::new(transport.clone());
        let stats = client
            .cluster_stats()
            .node_id(["node-1", "node-2"])
            .send(&Context::background())
            .await
            .unwrap();
        assert_eq!(stats.indices.count, 2);
        assert_eq!(stats.indices.docs.deleted, 1);
        assert!(stats.indices.others.contains_key("store"));
        assert_eq!(stats.nodes.count.get("data"), Some(&1));
        assert_eq!(stats.nodes.versions, vec!["7.10.0".to_string()]);
        assert_eq!(stats.nodes_info.map(|n| n.successful), Some(1));

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/_cluster/stats/nodes/node-1,node-2");
    }
}
