//! Point in time, a frozen view of indices for consistent paging.
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{strings, CommonParams};
use crate::client::Client;
use crate::domain::model::common::ShardsInfo;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Body, Method, Params, Request, CONTENT_TYPE_JSON};
use crate::utils::path;

/// Opens a point in time, see [`Client::open_point_in_time`].
#[derive(Debug, Clone)]
pub struct OpenPointInTimeService {
    client: Client,
    common: CommonParams,
    index: Vec<String>,
    keep_alive: Option<String>,
    preference: Option<String>,
    routing: Option<String>,
    ignore_unavailable: Option<bool>,
    expand_wildcards: Option<String>,
}

impl OpenPointInTimeService {
    pub(crate) fn new(client: Client) -> Self {
        OpenPointInTimeService {
            client,
            common: CommonParams::default(),
            index: Vec::new(),
            keep_alive: None,
            preference: None,
            routing: None,
            ignore_unavailable: None,
            expand_wildcards: None,
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

    /// How long the point in time is kept, e.g. `1m`.
    pub fn keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
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

    pub fn ignore_unavailable(mut self, ignore_unavailable: bool) -> Self {
        self.ignore_unavailable = Some(ignore_unavailable);
        self
    }

    pub fn expand_wildcards(mut self, expand_wildcards: impl Into<String>) -> Self {
        self.expand_wildcards = Some(expand_wildcards.into());
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = format!("/{}/_pit", path::encode_list(&self.index));
        let mut params = self.common.params();
        params.set_opt("keep_alive", &self.keep_alive);
        params.set_opt("preference", &self.preference);
        params.set_opt("routing", &self.routing);
        params.set_opt("ignore_unavailable", &self.ignore_unavailable);
        params.set_opt("expand_wildcards", &self.expand_wildcards);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.index.is_empty() {
            missing.push("Index");
        }
        if self.keep_alive.is_none() {
            missing.push("KeepAlive");
        }
        Error::check_missing(missing)
    }

    pub async fn send(&self, ctx: &Context) -> Result<OpenPointInTimeResponse, Error> {
        self.validate()?;
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
pub struct OpenPointInTimeResponse {
    pub id: String,
}

/// Releases a point in time, see [`Client::close_point_in_time`].
#[derive(Debug, Clone)]
pub struct ClosePointInTimeService {
    client: Client,
    common: CommonParams,
    id: Option<String>,
}

impl ClosePointInTimeService {
    pub(crate) fn new(client: Client) -> Self {
        ClosePointInTimeService {
            client,
            common: CommonParams::default(),
            id: None,
        }
    }

    common_setters!();

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        (String::from("/_pit"), self.common.params())
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.id.is_none() {
            missing.push("Id");
        }
        Error::check_missing(missing)
    }

    pub async fn send(&self, ctx: &Context) -> Result<ClosePointInTimeResponse, Error> {
        self.validate()?;
        let (url, params) = self.build_url();
        let request = Request::new(Method::DELETE, url)
            .params(params)
            .body(Some(Body::Json(json!({ "id": self.id }))))
            .content_type(CONTENT_TYPE_JSON)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClosePointInTimeResponse {
    pub succeeded: bool,
    pub num_freed: u32,
    #[serde(rename = "_shards", skip_serializing_if = "Option::is_none")]
    pub shards: Option<ShardsInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_open_and_close() {
        let transport = Arc::new(
            CannedTransport::new()
                .respond(200, r#"{"id":"46ToAwMDaWR5BXV1aWQy"}"#)
                .respond(200, r#"{"succeeded":true,"num_freed":3}"#),
        );
        let client = Client::new(transport.clone());
        let ctx = Context::background();
        let pit = client
            .open_point_in_time()
            .index(["twitter"])
            .keep_alive("1m")
            .send(&ctx)
            .await
            .unwrap();
        let closed = client
            .close_point_in_time()
            .id(pit.id.clone())
            .send(&ctx)
            .await
            .unwrap();
        assert!(closed.succeeded);
        assert_eq!(closed.num_freed, 3);

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/twitter/_pit");
        assert_eq!(requests[0].params.get("keep_alive"), Some("1m"));
        assert_eq!(requests[1].method, Method::DELETE);
        assert_eq!(
            requests[1].body,
            Some(Body::Json(json!({"id": "46ToAwMDaWR5BXV1aWQy"})))
        );
    }

    #[test]
    fn should_require_keep_alive() {
        let client = Client::new(CannedTransport::new());
        match client.open_point_in_time().index(["twitter"]).validate() {
            Err(Error::MissingFields { fields }) => assert_eq!(fields, vec!["KeepAlive"]),
            other => panic!("unexpected {:?}", other),
        }
    }
}
