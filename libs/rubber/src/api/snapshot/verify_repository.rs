use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::api::CommonParams;
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Checks that a repository is usable from every node, see
/// [`Client::snapshot_verify_repository`].
#[derive(Debug, Clone)]
pub struct SnapshotVerifyRepositoryService {
    client: Client,
    common: CommonParams,
    repository: Option<String>,
    master_timeout: Option<String>,
    timeout: Option<String>,
}

impl SnapshotVerifyRepositoryService {
    pub(crate) fn new(client: Client) -> Self {
        SnapshotVerifyRepositoryService {
            client,
            common: CommonParams::default(),
            repository: None,
            master_timeout: None,
            timeout: None,
        }
    }

    common_setters!();

    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
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

    pub fn build_url(&self) -> (String, Params) {
        let url = format!(
            "/_snapshot/{}/_verify",
            path::encode(self.repository.as_deref().unwrap_or_default())
        );
        let mut params = self.common.params();
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_opt("timeout", &self.timeout);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.repository.is_none() {
            missing.push("Repository");
        }
        Error::check_missing(missing)
    }

    pub async fn send(&self, ctx: &Context) -> Result<SnapshotVerifyRepositoryResponse, Error> {
        self.validate()?;
        let (url, params) = self.build_url();
        let request = Request::new(Method::POST, url)
            .params(params)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

/// Nodes which could access the repository, by node id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotVerifyRepositoryResponse {
    pub nodes: HashMap<String, SnapshotVerifyRepositoryNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotVerifyRepositoryNode {
    pub name: String,
}
