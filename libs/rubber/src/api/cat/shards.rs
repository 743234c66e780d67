use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::{expand_columns, SHARDS_ALIASES};
use crate::api::{strings, CommonParams};
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::deserialize::deserialize_opt_number;
use crate::utils::path;

/// Lists shard copies and where they live, see [`Client::cat_shards`].
#[derive(Debug, Clone)]
pub struct CatShardsService {
    client: Client,
    common: CommonParams,
    index: Vec<String>,
    bytes: Option<String>,
    local: Option<bool>,
    master_timeout: Option<String>,
    columns: Vec<String>,
    sort: Vec<String>,
    time: Option<String>,
}

impl CatShardsService {
    pub(crate) fn new(client: Client) -> Self {
        CatShardsService {
            client,
            common: CommonParams::default(),
            index: Vec::new(),
            bytes: None,
            local: None,
            master_timeout: None,
            columns: Vec::new(),
            sort: Vec::new(),
            time: None,
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

    pub fn bytes(mut self, bytes: impl Into<String>) -> Self {
        self.bytes = Some(bytes.into());
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

    /// Columns to return, by name or alias.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(strings(columns));
        self
    }

    pub fn sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort.extend(strings(sort));
        self
    }

    /// Unit of durations: `d`, `h`, `m`, `s`, `ms`, `micros` or `nanos`.
    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = if self.index.is_empty() {
            String::from("/_cat/shards")
        } else {
            format!("/_cat/shards/{}", path::encode_list(&self.index))
        };
        let mut params = self.common.params();
        params.set("format", "json");
        params.set_opt("bytes", &self.bytes);
        params.set_opt("local", &self.local);
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_list("h", &expand_columns(&self.columns, &SHARDS_ALIASES));
        params.set_list("s", &self.sort);
        params.set_opt("time", &self.time);
        (url, params)
    }

    pub async fn send(&self, ctx: &Context) -> Result<Vec<CatShardsResponseRow>, Error> {
        let (url, params) = self.build_url();
        let request = Request::new(Method::GET, url)
            .params(params)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

/// One row of cat shards. Columns without a dedicated field end up in `others`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatShardsResponseRow {
    pub index: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_number")]
    pub shard: Option<u32>,
    /// `p` for a primary, `r` for a replica.
    pub prirep: Option<String>,
    pub state: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_number")]
    pub docs: Option<u64>,
    pub store: Option<String>,
    pub ip: Option<String>,
    pub id: Option<String>,
    pub node: Option<String>,
    #[serde(rename = "unassigned.reason")]
    pub unassigned_reason: Option<String>,
    #[serde(rename = "unassigned.at")]
    pub unassigned_at: Option<String>,
    #[serde(rename = "unassigned.for")]
    pub unassigned_for: Option<String>,
    #[serde(rename = "unassigned.details")]
    pub unassigned_details: Option<String>,
    #[serde(rename = "recoverysource.type")]
    pub recovery_source_type: Option<String>,
    #[serde(rename = "seq_no.max", deserialize_with = "deserialize_opt_number")]
    pub seq_no_max: Option<i64>,
    #[serde(rename = "seq_no.global_checkpoint", deserialize_with = "deserialize_opt_number")]
    pub seq_no_global_checkpoint: Option<i64>,
    #[serde(flatten)]
    pub others: HashMap<String, Value>,
}
