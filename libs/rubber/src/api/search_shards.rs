//! Which shards and nodes a search would hit.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::api::{strings, CommonParams, IndicesOptions};
use crate::client::Client;
use crate::domain::model::common::ShardRouting;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// See [`Client::search_shards`].
#[derive(Debug, Clone)]
pub struct SearchShardsService {
    client: Client,
    common: CommonParams,
    options: IndicesOptions,
    index: Vec<String>,
    preference: Option<String>,
    routing: Option<String>,
    local: Option<bool>,
}

impl SearchShardsService {
    pub(crate) fn new(client: Client) -> Self {
        SearchShardsService {
            client,
            common: CommonParams::default(),
            options: IndicesOptions::default(),
            index: Vec::new(),
            preference: None,
            routing: None,
            local: None,
        }
    }

    common_setters!();
    indices_options_setters!();

    pub fn index<I, S>(mut self, index: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index.extend(strings(index));
        self
    }

    pub fn preference(mut self, preference: impl Into<String>) -> Self {
        self.preference = Some(preference.into());
        self
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = Some(local);
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = format!("/{}/_search_shards", path::encode_list(&self.index));
        let mut params = self.common.params();
        self.options.set_params(&mut params);
        params.set_opt("preference", &self.preference);
        params.set_opt("routing", &self.routing);
        params.set_opt("local", &self.local);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.index.is_empty() {
            missing.push("Index");
        }
        Error::check_missing(missing)
    }

    pub async fn send(&self, ctx: &Context) -> Result<SearchShardsResponse, Error> {
        self.validate()?;
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
pub struct SearchShardsResponse {
    pub nodes: HashMap<String, SearchShardsNode>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub indices: HashMap<String, Value>,
    /// One group per shard, holding its copies.
    pub shards: Vec<Vec<ShardRouting>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchShardsNode {
    pub name: String,
    pub ephemeral_id: String,
    pub transport_address: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_decode_routing_groups() {
        let transport = Arc::new(CannedTransport::new().respond(
            200,
            r#"{"nodes":{"JklnKbD7Tyqi9TP3_Q_tBg":{"name":"node-1","ephemeral_id":"e1",
                    "transport_address":"127.0.0.1:9300","attributes":{}}},
                "indices":{"twitter":{}},
                "shards":[[{"index":"twitter","node":"JklnKbD7Tyqi9TP3_Q_tBg","primary":true,
                    "shard":0,"state":"STARTED","allocation_id":{"id":"0TvkCyF7TAmM1wHP4a42-A"},
                    "relocating_node":null}]]}"#,
        ));
        let client = Client::new(transport.clone());
        let response = client
            .search_shards()
            .index(["twitter"])
            .routing("user1")
            .send(&Context::background())
            .await
            .unwrap();
        assert_eq!(response.nodes["JklnKbD7Tyqi9TP3_Q_tBg"].name, "node-1");
        assert_eq!(response.shards.len(), 1);
        let copy = &response.shards[0][0];
        assert!(copy.primary);
        assert_eq!(
            copy.allocation_id.as_ref().map(|a| a.id.as_str()),
            Some("0TvkCyF7TAmM1wHP4a42-A")
        );

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/twitter/_search_shards");
        assert_eq!(request.params.get("routing"), Some("user1"));
    }
}
