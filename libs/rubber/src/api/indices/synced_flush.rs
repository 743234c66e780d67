use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::api::{strings, CommonParams, IndicesOptions};
use crate::client::Client;
use crate::domain::model::common::{ShardRouting, ShardsInfo};
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Performs a synced flush, see [`Client::indices_synced_flush`].
///
/// When some shards fail, the server answers 409 with the same body as a
/// success; the response is decoded in both cases.
#[derive(Debug, Clone)]
pub struct IndicesSyncedFlushService {
    client: Client,
    common: CommonParams,
    options: IndicesOptions,
    index: Vec<String>,
}

impl IndicesSyncedFlushService {
    pub(crate) fn new(client: Client) -> Self {
        IndicesSyncedFlushService {
            client,
            common: CommonParams::default(),
            options: IndicesOptions::default(),
            index: Vec::new(),
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

    pub fn build_url(&self) -> (String, Params) {
        let url = if self.index.is_empty() {
            String::from("/_flush/synced")
        } else {
            format!("/{}/_flush/synced", path::encode_list(&self.index))
        };
        let mut params = self.common.params();
        self.options.set_params(&mut params);
        (url, params)
    }

    pub async fn send(&self, ctx: &Context) -> Result<IndicesSyncedFlushResponse, Error> {
        let (url, params) = self.build_url();
        let request = Request::new(Method::POST, url)
            .params(params)
            .headers(self.common.headers.clone())
            .ignore_errors(&[409]);
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

/// Outcome of a synced flush: the overall shard counts, and the counts of
/// each index under its name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicesSyncedFlushResponse {
    #[serde(rename = "_shards")]
    pub shards: ShardsInfo,
    #[serde(flatten)]
    pub index: HashMap<String, IndicesShardsSyncedFlushResult>,
}

impl<'de> Deserialize<'de> for IndicesSyncedFlushResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, Value>::deserialize(deserializer)?;
        let mut response = IndicesSyncedFlushResponse::default();
        for (key, value) in raw {
            if key == "_shards" {
                response.shards = serde_json::from_value(value).map_err(de::Error::custom)?;
            } else {
                let result = serde_json::from_value(value).map_err(de::Error::custom)?;
                response.index.insert(key, result);
            }
        }
        Ok(response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicesShardsSyncedFlushResult {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SyncedFlushFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncedFlushFailure {
    pub shard: u32,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<ShardRouting>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_split_shards_header_from_indices() {
        let transport = Arc::new(CannedTransport::new().respond(
            200,
            r#"{"_shards":{"total":4,"successful":4,"failed":0},
                "twitter":{"total":2,"successful":2,"failed":0},
                "logs":{"total":2,"successful":2,"failed":0}}"#,
        ));
        let client = Client::new(transport.clone());
        let response = client
            .indices_synced_flush()
            .index(["twitter", "logs"])
            .send(&Context::background())
            .await
            .unwrap();
        assert_eq!(response.shards.total, 4);
        assert_eq!(response.index.len(), 2);
        assert_eq!(response.index["twitter"].successful, 2);
        assert_eq!(
            transport.last_request().unwrap().path,
            "/twitter,logs/_flush/synced"
        );
    }

    #[tokio::test]
    async fn should_decode_partial_failure_on_conflict() {
        let client = Client::new(CannedTransport::new().respond(
            409,
            r#"{"_shards":{"total":4,"successful":2,"failed":2},
                "twitter":{"total":4,"successful":2,"failed":2,"failures":[
                    {"shard":1,"reason":"unexpected error",
                     "routing":{"state":"STARTED","primary":false,"node":"n1","shard":1,"index":"twitter"}},
                    {"shard":1,"reason":"pending operations"}]}}"#,
        ));
        let response = client
            .indices_synced_flush()
            .send(&Context::background())
            .await
            .unwrap();
        assert_eq!(response.shards.failed, 2);
        let failures = &response.index["twitter"].failures;
        assert_eq!(failures.len(), 2);
        assert_eq!(
            failures[0].routing.as_ref().and_then(|r| r.node.as_deref()),
            Some("n1")
        );
        assert!(failures[1].routing.is_none());
    }

    #[tokio::test]
    async fn should_still_fail_on_other_errors() {
        let client = Client::new(CannedTransport::new().respond(
            404,
            r#"{"error":{"type":"index_not_found_exception","reason":"no such index"},"status":404}"#,
        ));
        let err = client
            .indices_synced_flush()
            .index(["missing"])
            .send(&Context::background())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
