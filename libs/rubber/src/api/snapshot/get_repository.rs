use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::api::{strings, CommonParams};
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Reads repository definitions, all of them when none is named, see
/// [`Client::snapshot_get_repository`].
#[derive(Debug, Clone)]
pub struct SnapshotGetRepositoryService {
    client: Client,
    common: CommonParams,
    repositories: Vec<String>,
    local: Option<bool>,
    master_timeout: Option<String>,
}

impl SnapshotGetRepositoryService {
    pub(crate) fn new(client: Client) -> Self {
        SnapshotGetRepositoryService {
            client,
            common: CommonParams::default(),
            repositories: Vec::new(),
            local: None,
            master_timeout: None,
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

    pub fn local(mut self, local: bool) -> Self {
        self.local = Some(local);
        self
    }

    pub fn master_timeout(mut self, master_timeout: impl Into<String>) -> Self {
        self.master_timeout = Some(master_timeout.into());
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = if self.repositories.is_empty() {
            String::from("/_snapshot")
        } else {
            format!("/_snapshot/{}", path::encode_list(&self.repositories))
        };
        let mut params = self.common.params();
        params.set_opt("local", &self.local);
        params.set_opt("master_timeout", &self.master_timeout);
        (url, params)
    }

    pub async fn send(&self, ctx: &Context) -> Result<SnapshotGetRepositoryResponse, Error> {
        let (url, params) = self.build_url();
        let request = Request::new(Method::GET, url)
            .params(params)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

/// Repository definitions by name.
pub type SnapshotGetRepositoryResponse = HashMap<String, SnapshotRepositoryMetaData>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotRepositoryMetaData {
    #[serde(rename = "type")]
    pub repository_type: String,
    pub settings: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_get_repositories() {
        let transport = Arc::new(CannedTransport::new().respond(
            200,
            r#"{"my_backup":{"type":"fs","settings":{"location":"/tmp/backups","compress":"true"}}}"#,
        ));
        let client = Client::new(transport.clone());
        let repositories = client
            .snapshot_get_repository()
            .repository(["my_backup"])
            .local(true)
            .send(&Context::background())
            .await
            .unwrap();
        let repository = &repositories["my_backup"];
        assert_eq!(repository.repository_type, "fs");
        assert_eq!(repository.settings["location"], "/tmp/backups");

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/_snapshot/my_backup");
        assert_eq!(request.params.get("local"), Some("true"));
    }

    #[test]
    fn should_list_every_repository_by_default() {
        let client = Client::new(CannedTransport::new());
        assert_eq!(client.snapshot_get_repository().build_url().0, "/_snapshot");
    }
}
