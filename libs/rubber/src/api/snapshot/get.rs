use serde::{Deserialize, Serialize};

use super::SnapshotInfo;
use crate::api::{strings, CommonParams};
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Lists snapshots of a repository, all of them when none is named, see
/// [`Client::snapshot_get`].
#[derive(Debug, Clone)]
pub struct SnapshotGetService {
    client: Client,
    common: CommonParams,
    repository: Option<String>,
    snapshots: Vec<String>,
    master_timeout: Option<String>,
    ignore_unavailable: Option<bool>,
    verbose: Option<bool>,
}

impl SnapshotGetService {
    pub(crate) fn new(client: Client) -> Self {
        SnapshotGetService {
            client,
            common: CommonParams::default(),
            repository: None,
            snapshots: Vec::new(),
            master_timeout: None,
            ignore_unavailable: None,
            verbose: None,
        }
    }

    common_setters!();

    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn snapshot<I, S>(mut self, snapshots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.snapshots.extend(strings(snapshots));
        self
    }

    pub fn master_timeout(mut self, master_timeout: impl Into<String>) -> Self {
        self.master_timeout = Some(master_timeout.into());
        self
    }

    /// Skips snapshots which are missing instead of failing.
    pub fn ignore_unavailable(mut self, ignore_unavailable: bool) -> Self {
        self.ignore_unavailable = Some(ignore_unavailable);
        self
    }

    /// With `false`, only names, uuids and indices are returned.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let snapshots = if self.snapshots.is_empty() {
            String::from("_all")
        } else {
            path::encode_list(&self.snapshots)
        };
        let url = format!(
            "/_snapshot/{}/{}",
            path::encode(self.repository.as_deref().unwrap_or_default()),
            snapshots
        );
        let mut params = self.common.params();
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_opt("ignore_unavailable", &self.ignore_unavailable);
        params.set_opt("verbose", &self.verbose);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.repository.is_none() {
            missing.push("Repository");
        }
        Error::check_missing(missing)
    }

    pub async fn send(&self, ctx: &Context) -> Result<SnapshotGetResponse, Error> {
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
pub struct SnapshotGetResponse {
    pub snapshots: Vec<SnapshotInfo>,
}
