use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SnapshotInfo;
use crate::api::CommonParams;
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Body, Method, Params, Request, CONTENT_TYPE_JSON};
use crate::utils::path;

/// Takes a snapshot, see [`Client::snapshot_create`].
#[derive(Debug, Clone)]
pub struct SnapshotCreateService {
    client: Client,
    common: CommonParams,
    repository: Option<String>,
    snapshot: Option<String>,
    master_timeout: Option<String>,
    wait_for_completion: Option<bool>,
    body: Option<Body>,
}

impl SnapshotCreateService {
    pub(crate) fn new(client: Client) -> Self {
        SnapshotCreateService {
            client,
            common: CommonParams::default(),
            repository: None,
            snapshot: None,
            master_timeout: None,
            wait_for_completion: None,
            body: None,
        }
    }

    common_setters!();

    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn snapshot(mut self, snapshot: impl Into<String>) -> Self {
        self.snapshot = Some(snapshot.into());
        self
    }

    pub fn master_timeout(mut self, master_timeout: impl Into<String>) -> Self {
        self.master_timeout = Some(master_timeout.into());
        self
    }

    /// Blocks until the snapshot is done, in which case the response carries
    /// its description.
    pub fn wait_for_completion(mut self, wait_for_completion: bool) -> Self {
        self.wait_for_completion = Some(wait_for_completion);
        self
    }

    /// Optional body, restricting indices or adding metadata.
    pub fn body_json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    pub fn body_string(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = format!(
            "/_snapshot/{}/{}",
            path::encode(self.repository.as_deref().unwrap_or_default()),
            path::encode(self.snapshot.as_deref().unwrap_or_default())
        );
        let mut params = self.common.params();
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_opt("wait_for_completion", &self.wait_for_completion);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.repository.is_none() {
            missing.push("Repository");
        }
        if self.snapshot.is_none() {
            missing.push("Snapshot");
        }
        Error::check_missing(missing)
    }

    pub async fn send(&self, ctx: &Context) -> Result<SnapshotCreateResponse, Error> {
        self.validate()?;
        let (url, params) = self.build_url();
        let mut request = Request::new(Method::PUT, url)
            .params(params)
            .headers(self.common.headers.clone());
        if self.body.is_some() {
            request = request
                .body(self.body.clone())
                .content_type(CONTENT_TYPE_JSON);
        }
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

/// `accepted` is set when not waiting for completion, `snapshot` otherwise.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotCreateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotInfo>,
}
