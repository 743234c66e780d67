use serde::{Deserialize, Serialize};
use serde_json::Value;
use snafu::ResultExt;

use crate::api::{strings, CommonParams};
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::{Error, SerializationSnafu};
use crate::domain::model::request::{Body, Method, Params, Request, CONTENT_TYPE_JSON};
use crate::utils::path;

/// Runs text through an analyzer, see [`Client::indices_analyze`].
///
/// The request is described either field by field, or as a whole with
/// [`IndicesAnalyzeService::body_json`], which takes precedence.
#[derive(Debug, Clone)]
pub struct IndicesAnalyzeService {
    client: Client,
    common: CommonParams,
    index: Option<String>,
    prefer_local: Option<bool>,
    request: IndicesAnalyzeRequest,
    body: Option<Body>,
}

/// The typed body of an analyze request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicesAnalyzeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub char_filter: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalizer: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<Value>,
}

impl IndicesAnalyzeService {
    pub(crate) fn new(client: Client) -> Self {
        IndicesAnalyzeService {
            client,
            common: CommonParams::default(),
            index: None,
            prefer_local: None,
            request: IndicesAnalyzeRequest::default(),
            body: None,
        }
    }

    common_setters!();

    /// Index whose analyzers and mappings are used.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn prefer_local(mut self, prefer_local: bool) -> Self {
        self.prefer_local = Some(prefer_local);
        self
    }

    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.request.analyzer = Some(analyzer.into());
        self
    }

    /// Token attributes to report when `explain` is set.
    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.attributes.extend(strings(attributes));
        self
    }

    /// A char filter, by name or inline definition.
    pub fn char_filter(mut self, char_filter: impl Into<Value>) -> Self {
        self.request.char_filter.push(char_filter.into());
        self
    }

    pub fn explain(mut self, explain: bool) -> Self {
        self.request.explain = Some(explain);
        self
    }

    /// Uses the analyzer of this field.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.request.field = Some(field.into());
        self
    }

    /// A token filter, by name or inline definition.
    pub fn filter(mut self, filter: impl Into<Value>) -> Self {
        self.request.filter.push(filter.into());
        self
    }

    pub fn normalizer(mut self, normalizer: impl Into<String>) -> Self {
        self.request.normalizer = Some(normalizer.into());
        self
    }

    pub fn text<I, S>(mut self, text: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.text.extend(strings(text));
        self
    }

    /// The tokenizer, by name or inline definition.
    pub fn tokenizer(mut self, tokenizer: impl Into<Value>) -> Self {
        self.request.tokenizer = Some(tokenizer.into());
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
        let url = match &self.index {
            Some(index) => format!("/{}/_analyze", path::encode(index)),
            None => String::from("/_analyze"),
        };
        let mut params = self.common.params();
        params.set_opt("prefer_local", &self.prefer_local);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.request.text.is_empty() && self.body.is_none() {
            missing.push("Text");
        }
        Error::check_missing(missing)
    }

    fn body(&self) -> Result<Body, Error> {
        match &self.body {
            Some(body) => Ok(body.clone()),
            None => serde_json::to_value(&self.request)
                .map(Body::Json)
                .context(SerializationSnafu {
                    details: String::from("cannot serialize analyze request"),
                }),
        }
    }

    pub async fn send(&self, ctx: &Context) -> Result<IndicesAnalyzeResponse, Error> {
        self.validate()?;
        let (url, params) = self.build_url();
        let request = Request::new(Method::POST, url)
            .params(params)
            .body(Some(self.body()?))
            .content_type(CONTENT_TYPE_JSON)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicesAnalyzeResponse {
    pub tokens: Vec<AnalyzeToken>,
    /// Reported when `explain` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyzeToken {
    pub token: String,
    pub start_offset: u32,
    pub end_offset: u32,
    #[serde(rename = "type")]
    pub token_type: String,
    pub position: u32,
}
