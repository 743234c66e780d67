use crate::api::CommonParams;
use crate::client::Client;
use crate::domain::model::common::AcknowledgedResponse;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Removes a pipeline, see [`Client::ingest_delete_pipeline`].
#[derive(Debug, Clone)]
pub struct IngestDeletePipelineService {
    client: Client,
    common: CommonParams,
    id: Option<String>,
    master_timeout: Option<String>,
    timeout: Option<String>,
}

impl IngestDeletePipelineService {
    pub(crate) fn new(client: Client) -> Self {
        IngestDeletePipelineService {
            client,
            common: CommonParams::default(),
            id: None,
            master_timeout: None,
            timeout: None,
        }
    }

    common_setters!();

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
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
            "/_ingest/pipeline/{}",
            path::encode(self.id.as_deref().unwrap_or_default())
        );
        let mut params = self.common.params();
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_opt("timeout", &self.timeout);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.id.is_none() {
            missing.push("Id");
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
    async fn should_delete_pipeline() {
        let transport = Arc::new(CannedTransport::new().respond(200, r#"{"acknowledged":true}"#));
        let client = Client::new(transport.clone());
        client
            .ingest_delete_pipeline()
            .id("my-pipeline-id")
            .master_timeout("30s")
            .send(&Context::background())
            .await
            .unwrap();
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path, "/_ingest/pipeline/my-pipeline-id");
        assert_eq!(request.params.get("master_timeout"), Some("30s"));
    }
}
