use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::api::CommonParams;
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::{Error, ErrorDetails};
use crate::domain::model::request::{Body, Method, Params, Request, CONTENT_TYPE_JSON};
use crate::utils::path;

/// Runs documents through a pipeline without indexing them, see
/// [`Client::ingest_simulate_pipeline`].
///
/// Without an id, the body must define the pipeline inline.
#[derive(Debug, Clone)]
pub struct IngestSimulatePipelineService {
    client: Client,
    common: CommonParams,
    id: Option<String>,
    verbose: Option<bool>,
    body: Option<Body>,
}

impl IngestSimulatePipelineService {
    pub(crate) fn new(client: Client) -> Self {
        IngestSimulatePipelineService {
            client,
            common: CommonParams::default(),
            id: None,
            verbose: None,
            body: None,
        }
    }

    common_setters!();

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Reports the output of every processor.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn body_json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    pub fn body_string(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = match &self.id {
            Some(id) => format!("/_ingest/pipeline/{}/_simulate", path::encode(id)),
            None => String::from("/_ingest/pipeline/_simulate"),
        };
        let mut params = self.common.params();
        params.set_opt("verbose", &self.verbose);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.body.is_none() {
            missing.push("BodyJson");
        }
        Error::check_missing(missing)
    }

    pub async fn send(&self, ctx: &Context) -> Result<IngestSimulatePipelineResponse, Error> {
        self.validate()?;
        let (url, params) = self.build_url();
        let request = Request::new(Method::POST, url)
            .params(params)
            .body(self.body.clone())
            .content_type(CONTENT_TYPE_JSON)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IngestSimulatePipelineResponse {
    pub docs: Vec<IngestSimulateDocumentResult>,
}

/// Outcome for one document: `doc` in normal mode, `processor_results` in
/// verbose mode.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IngestSimulateDocumentResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<HashMap<String, Value>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub processor_results: Vec<IngestSimulateProcessorResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IngestSimulateProcessorResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<HashMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_simulate_inline_pipeline() {
        let transport = Arc::new(CannedTransport::new().respond(
            200,
            r#"{"docs":[{"doc":{"_index":"index","_id":"id","_source":{"foo":"bar","field2":"_value"}}}]}"#,
        ));
        let client = Client::new(transport.clone());
        let response = client
            .ingest_simulate_pipeline()
            .body_json(json!({
                "pipeline": {"processors": [{"set": {"field": "field2", "value": "_value"}}]},
                "docs": [{"_index": "index", "_id": "id", "_source": {"foo": "bar"}}]
            }))
            .send(&Context::background())
            .await
            .unwrap();
        let doc = response.docs[0].doc.as_ref().unwrap();
        assert_eq!(doc["_source"]["field2"], "_value");
        assert_eq!(
            transport.last_request().unwrap().path,
            "/_ingest/pipeline/_simulate"
        );
    }

    #[tokio::test]
    async fn should_report_processor_results_in_verbose_mode() {
        let transport = Arc::new(CannedTransport::new().respond(
            200,
            r#"{"docs":[{"processor_results":[
                {"processor_type":"set","status":"success","tag":"t1","doc":{"_source":{}}},
                {"processor_type":"fail","status":"error",
                 "error":{"type":"fail_processor_exception","reason":"boom"}}]}]}"#,
        ));
        let client = Client::new(transport.clone());
        let response = client
            .ingest_simulate_pipeline()
            .id("my-pipeline-id")
            .verbose(true)
            .body_string(r#"{"docs":[{"_source":{}}]}"#)
            .send(&Context::background())
            .await
            .unwrap();
        let results = &response.docs[0].processor_results;
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[1].error.as_ref().map(|e| e.reason.as_str()),
            Some("boom")
        );
        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/_ingest/pipeline/my-pipeline-id/_simulate");
        assert_eq!(request.params.get("verbose"), Some("true"));
    }
}
