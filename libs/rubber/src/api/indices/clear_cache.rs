use serde::{Deserialize, Serialize};

use crate::api::{strings, CommonParams, IndicesOptions};
use crate::client::Client;
use crate::domain::model::common::ShardsInfo;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Clears caches of indices, see [`Client::indices_clear_cache`].
#[derive(Debug, Clone)]
pub struct IndicesClearCacheService {
    client: Client,
    common: CommonParams,
    options: IndicesOptions,
    index: Vec<String>,
    fielddata: Option<bool>,
    fields: Vec<String>,
    query: Option<bool>,
    request: Option<bool>,
}

impl IndicesClearCacheService {
    pub(crate) fn new(client: Client) -> Self {
        IndicesClearCacheService {
            client,
            common: CommonParams::default(),
            options: IndicesOptions::default(),
            index: Vec::new(),
            fielddata: None,
            fields: Vec::new(),
            query: None,
            request: None,
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

    pub fn fielddata(mut self, fielddata: bool) -> Self {
        self.fielddata = Some(fielddata);
        self
    }

    /// Clears the fielddata of these fields only.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(strings(fields));
        self
    }

    pub fn query(mut self, query: bool) -> Self {
        self.query = Some(query);
        self
    }

    pub fn request(mut self, request: bool) -> Self {
        self.request = Some(request);
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = if self.index.is_empty() {
            String::from("/_cache/clear")
        } else {
            format!("/{}/_cache/clear", path::encode_list(&self.index))
        };
        let mut params = self.common.params();
        self.options.set_params(&mut params);
        params.set_opt("fielddata", &self.fielddata);
        params.set_list("fields", &self.fields);
        params.set_opt("query", &self.query);
        params.set_opt("request", &self.request);
        (url, params)
    }

    pub async fn send(&self, ctx: &Context) -> Result<IndicesClearCacheResponse, Error> {
        let (url, params) = self.build_url();
        let request = Request::new(Method::POST, url)
            .params(params)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicesClearCacheResponse {
    #[serde(rename = "_shards")]
    pub shards: ShardsInfo,
}
