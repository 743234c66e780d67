use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::{expand_columns, INDICES_ALIASES};
use crate::api::{strings, CommonParams};
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::deserialize::deserialize_opt_number;
use crate::utils::path;

/// Lists indices with their health and statistics, see [`Client::cat_indices`].
#[derive(Debug, Clone)]
pub struct CatIndicesService {
    client: Client,
    common: CommonParams,
    index: Vec<String>,
    bytes: Option<String>,
    local: Option<bool>,
    master_timeout: Option<String>,
    columns: Vec<String>,
    health: Option<String>,
    primary: Option<bool>,
    sort: Vec<String>,
    expand_wildcards: Option<String>,
}

impl CatIndicesService {
    pub(crate) fn new(client: Client) -> Self {
        CatIndicesService {
            client,
            common: CommonParams::default(),
            index: Vec::new(),
            bytes: None,
            local: None,
            master_timeout: None,
            columns: Vec::new(),
            health: None,
            primary: None,
            sort: Vec::new(),
            expand_wildcards: None,
        }
    }

    common_setters!();

    /// Restricts the listing to these indices (wildcards allowed).
    pub fn index<I, S>(mut self, index: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index.extend(strings(index));
        self
    }

    /// Unit of sizes: `b`, `k`, `kb`, `m`, `mb`, `g`, `gb`, `t`, `tb`, `p` or `pb`.
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

    /// Only indices with this health: `green`, `yellow` or `red`.
    pub fn health(mut self, health: impl Into<String>) -> Self {
        self.health = Some(health.into());
        self
    }

    /// Only report statistics of primary shards.
    pub fn primary(mut self, primary: bool) -> Self {
        self.primary = Some(primary);
        self
    }

    /// Sort columns, e.g. `docs.count:desc`.
    pub fn sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort.extend(strings(sort));
        self
    }

    pub fn expand_wildcards(mut self, expand_wildcards: impl Into<String>) -> Self {
        self.expand_wildcards = Some(expand_wildcards.into());
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = if self.index.is_empty() {
            String::from("/_cat/indices")
        } else {
            format!("/_cat/indices/{}", path::encode_list(&self.index))
        };
        let mut params = self.common.params();
        params.set("format", "json");
        params.set_opt("bytes", &self.bytes);
        params.set_opt("local", &self.local);
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_list("h", &expand_columns(&self.columns, &INDICES_ALIASES));
        params.set_opt("health", &self.health);
        params.set_opt("pri", &self.primary);
        params.set_list("s", &self.sort);
        params.set_opt("expand_wildcards", &self.expand_wildcards);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        Ok(())
    }

    pub async fn send(&self, ctx: &Context) -> Result<Vec<CatIndicesResponseRow>, Error> {
        self.validate()?;
        let (url, params) = self.build_url();
        let request = Request::new(Method::GET, url)
            .params(params)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

/// One row of cat indices. Only the requested columns are filled; columns
/// without a dedicated field end up in `others`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatIndicesResponseRow {
    pub health: Option<String>,
    pub status: Option<String>,
    pub index: Option<String>,
    pub uuid: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_number")]
    pub pri: Option<u32>,
    #[serde(deserialize_with = "deserialize_opt_number")]
    pub rep: Option<u32>,
    #[serde(rename = "docs.count", deserialize_with = "deserialize_opt_number")]
    pub docs_count: Option<u64>,
    #[serde(rename = "docs.deleted", deserialize_with = "deserialize_opt_number")]
    pub docs_deleted: Option<u64>,
    #[serde(rename = "creation.date", deserialize_with = "deserialize_opt_number")]
    pub creation_date: Option<i64>,
    #[serde(rename = "creation.date.string")]
    pub creation_date_string: Option<String>,
    /// A size, with a unit unless `bytes` was set.
    #[serde(rename = "store.size")]
    pub store_size: Option<String>,
    #[serde(rename = "pri.store.size")]
    pub pri_store_size: Option<String>,
    #[serde(rename = "query_cache.evictions", deserialize_with = "deserialize_opt_number")]
    pub query_cache_evictions: Option<u64>,
    #[serde(rename = "refresh.total", deserialize_with = "deserialize_opt_number")]
    pub refresh_total: Option<u64>,
    #[serde(rename = "refresh.external_total", deserialize_with = "deserialize_opt_number")]
    pub refresh_external_total: Option<u64>,
    #[serde(rename = "refresh.time")]
    pub refresh_time: Option<String>,
    #[serde(rename = "refresh.external_time")]
    pub refresh_external_time: Option<String>,
    #[serde(rename = "search.query_total", deserialize_with = "deserialize_opt_number")]
    pub search_query_total: Option<u64>,
    #[serde(rename = "segments.count", deserialize_with = "deserialize_opt_number")]
    pub segments_count: Option<u64>,
    #[serde(flatten)]
    pub others: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use std::sync::Arc;

    #[test]
    fn should_always_ask_for_json() {
        let client = Client::new(CannedTransport::new());
        let (url, params) = client.cat_indices().build_url();
        assert_eq!(url, "/_cat/indices");
        assert_eq!(params.get("format"), Some("json"));
        assert!(!params.contains("h"));
    }

    #[test]
    fn should_expand_column_aliases() {
        let client = Client::new(CannedTransport::new());
        let (url, params) = client
            .cat_indices()
            .index(["logs-*", "twitter"])
            .columns(["idx", "dc", "rto"])
            .sort(["dc:desc"])
            .primary(false)
            .build_url();
        assert_eq!(url, "/_cat/indices/logs-%2A,twitter");
        assert_eq!(
            params.get("h"),
            Some("idx,docs.count,refresh.total,refresh.external_total")
        );
        assert_eq!(params.get("s"), Some("dc:desc"));
        assert_eq!(params.get("pri"), Some("false"));
    }

    #[tokio::test]
    async fn should_decode_rows() {
        let transport = Arc::new(CannedTransport::new().respond(
            200,
            r#"[
                {"health":"green","status":"open","index":"twitter","uuid":"u1","pri":"1","rep":"0",
                 "docs.count":"1200","docs.deleted":"3","store.size":"1.2mb","pri.store.size":"1.2mb",
                 "refresh.total":"4","refresh.external_total":"2","flush.total":"1"},
                {"health":"red","status":"close","index":"closed","docs.count":null,"docs.deleted":""}
            ]"#,
        ));
        let client = Client::new(transport.clone());
        let rows = client
            .cat_indices()
            .columns(["h", "s", "i", "id", "p", "r", "dc", "dd", "ss", "rto", "ft"])
            .send(&Context::background())
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].docs_count, Some(1200));
        assert_eq!(rows[0].pri, Some(1));
        assert_eq!(rows[0].refresh_external_total, Some(2));
        assert_eq!(rows[0].store_size.as_deref(), Some("1.2mb"));
        assert_eq!(rows[0].others.get("flush.total"), Some(&Value::from("1")));
        assert_eq!(rows[1].status.as_deref(), Some("close"));
        assert_eq!(rows[1].docs_count, None);
        assert_eq!(rows[1].docs_deleted, None);

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.params.get("h"),
            Some("health,status,i,uuid,pri,rep,docs.count,docs.deleted,store.size,refresh.total,flush.total,refresh.external_total")
        );
    }
}
