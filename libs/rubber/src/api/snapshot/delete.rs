use crate::api::CommonParams;
use crate::client::Client;
use crate::domain::model::common::AcknowledgedResponse;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Deletes a snapshot, aborting it if still running, see
/// [`Client::snapshot_delete`].
#[derive(Debug, Clone)]
pub struct SnapshotDeleteService {
    client: Client,
    common: CommonParams,
    repository: Option<String>,
    snapshot: Option<String>,
    master_timeout: Option<String>,
}

impl SnapshotDeleteService {
    pub(crate) fn new(client: Client) -> Self {
        SnapshotDeleteService {
            client,
            common: CommonParams::default(),
            repository: None,
            snapshot: None,
            master_timeout: None,
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

    pub fn build_url(&self) -> (String, Params) {
        let url = format!(
            "/_snapshot/{}/{}",
            path::encode(self.repository.as_deref().unwrap_or_default()),
            path::encode(self.snapshot.as_deref().unwrap_or_default())
        );
        let mut params = self.common.params();
        params.set_opt("master_timeout", &self.master_timeout);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_delete_snapshot() {
        let transport = Arc::new(CannedTransport::new().respond(200, r#"{"acknowledged":true}"#));
        let client = Client::new(transport.clone());
        client
            .snapshot_delete()
            .repository("my_backup")
            .snapshot("snapshot 1")
            .send(&Context::background())
            .await
            .unwrap();
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path, "/_snapshot/my_backup/snapshot%201");
    }

    #[tokio::test]
    async fn should_surface_missing_snapshot() {
        let transport = Arc::new(CannedTransport::new().respond(
            404,
            r#"{"error":{"type":"snapshot_missing_exception","reason":"[my_backup:nope] is missing"},"status":404}"#,
        ));
        let client = Client::new(transport);
        let err = client
            .snapshot_delete()
            .repository("my_backup")
            .snapshot("nope")
            .send(&Context::background())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.details().map(|d| d.error_type.as_str()),
            Some("snapshot_missing_exception")
        );
    }
}
