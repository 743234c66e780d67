use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::api::{strings, CommonParams};
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Fetches pipelines, all of them when no id is given, see
/// [`Client::ingest_get_pipeline`].
#[derive(Debug, Clone)]
pub struct IngestGetPipelineService {
    client: Client,
    common: CommonParams,
    ids: Vec<String>,
    master_timeout: Option<String>,
}

impl IngestGetPipelineService {
    pub(crate) fn new(client: Client) -> Self {
        IngestGetPipelineService {
            client,
            common: CommonParams::default(),
            ids: Vec::new(),
            master_timeout: None,
        }
    }

    common_setters!();

    pub fn id<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(strings(ids));
        self
    }

    pub fn master_timeout(mut self, master_timeout: impl Into<String>) -> Self {
        self.master_timeout = Some(master_timeout.into());
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = if self.ids.is_empty() {
            String::from("/_ingest/pipeline")
        } else {
            format!("/_ingest/pipeline/{}", path::encode_list(&self.ids))
        };
        let mut params = self.common.params();
        params.set_opt("master_timeout", &self.master_timeout);
        (url, params)
    }

    pub async fn send(&self, ctx: &Context) -> Result<IngestGetPipelineResponse, Error> {
        let (url, params) = self.build_url();
        let request = Request::new(Method::GET, url)
            .params(params)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

/// Pipelines by id.
pub type IngestGetPipelineResponse = HashMap<String, IngestGetPipeline>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IngestGetPipeline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub processors: Vec<HashMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub on_failure: Vec<HashMap<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_get_pipelines() {
        let transport = Arc::new(CannedTransport::new().respond(
            200,
            r#"{"my-pipeline-id":{"description":"describe pipeline","version":123,
                "processors":[{"set":{"field":"foo","value":"bar"}}]}}"#,
        ));
        let client = Client::new(transport.clone());
        let pipelines = client
            .ingest_get_pipeline()
            .id(["my-pipeline-id", "other"])
            .send(&Context::background())
            .await
            .unwrap();
        let pipeline = &pipelines["my-pipeline-id"];
        assert_eq!(pipeline.version, Some(123));
        assert!(pipeline.processors[0].contains_key("set"));
        assert_eq!(
            transport.last_request().unwrap().path,
            "/_ingest/pipeline/my-pipeline-id,other"
        );
    }
}
