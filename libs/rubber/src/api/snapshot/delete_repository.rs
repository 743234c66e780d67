use crate::api::{strings, CommonParams};
use crate::client::Client;
use crate::domain::model::common::AcknowledgedResponse;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Unregisters repositories, see [`Client::snapshot_delete_repository`].
/// Snapshots stored in them are left untouched.
#[derive(Debug, Clone)]
pub struct SnapshotDeleteRepositoryService {
    client: Client,
    common: CommonParams,
    repositories: Vec<String>,
    master_timeout: Option<String>,
    timeout: Option<String>,
}

impl SnapshotDeleteRepositoryService {
    pub(crate) fn new(client: Client) -> Self {
        SnapshotDeleteRepositoryService {
            client,
            common: CommonParams::default(),
            repositories: Vec::new(),
            master_timeout: None,
            timeout: None,
        }
    }

    common_setters!();

    pub fn repository<I, S>(mut self, repositories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repositories.extend(strings(repositories));
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
        let url = format!("/_snapshot/{}", path::encode_list(&self.repositories));
        let mut params = self.common.params();
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_opt("timeout", &self.timeout);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.repositories.is_empty() {
            missing.push("Repository");
        }
        Error::check_missing(missing)
    }

    pub async fn send(&self, ctx: &Context) -> Result<AcknowledgedResponse, Error> {
        self.validate()?;
        let (url, params) = self.build_url();
        let request = Request::new(Method::DELETE, url)
            .params(params)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}
