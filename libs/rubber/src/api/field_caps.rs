//! Field capabilities across indices.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::api::{strings, CommonParams, IndicesOptions};
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Body, Method, Params, Request, CONTENT_TYPE_JSON};
use crate::utils::path;

/// Tells how fields are searchable and aggregatable in each index, see
/// [`Client::field_caps`].
///
/// Asking about missing indices is not an error: the response is empty.
#[derive(Debug, Clone)]
pub struct FieldCapsService {
    client: Client,
    common: CommonParams,
    options: IndicesOptions,
    index: Vec<String>,
    fields: Vec<String>,
    include_unmapped: Option<bool>,
    body: Option<Body>,
}

impl FieldCapsService {
    pub(crate) fn new(client: Client) -> Self {
        FieldCapsService {
            client,
            common: CommonParams::default(),
            options: IndicesOptions::default(),
            index: Vec::new(),
            fields: Vec::new(),
            include_unmapped: None,
            body: None,
        }
    }

    common_setters!();
    indices_options_setters!();

    pub fn index<I, S>(mut self, index: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index.extend(strings(index));
        self
    }

    /// Field names, wildcards allowed.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(strings(fields));
        self
    }

    pub fn include_unmapped(mut self, include_unmapped: bool) -> Self {
        self.include_unmapped = Some(include_unmapped);
        self
    }

    /// Body with an `index_filter` query.
    pub fn body_json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    pub fn body_string(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = if self.index.is_empty() {
            String::from("/_field_caps")
        } else {
            format!("/{}/_field_caps", path::encode_list(&self.index))
        };
        let mut params = self.common.params();
        self.options.set_params(&mut params);
        params.set_list("fields", &self.fields);
        params.set_opt("include_unmapped", &self.include_unmapped);
        (url, params)
    }

    pub async fn send(&self, ctx: &Context) -> Result<FieldCapsResponse, Error> {
        let (url, params) = self.build_url();
        let method = if self.body.is_some() {
            Method::POST
        } else {
            Method::GET
        };
        let mut request = Request::new(method, url)
            .params(params)
            .body(self.body.clone())
            .headers(self.common.headers.clone())
            .ignore_errors(&[404]);
        if self.body.is_some() {
            request = request.content_type(CONTENT_TYPE_JSON);
        }
        let response = self.client.perform_request(ctx, request).await?;
        if response.status == 404 {
            return Ok(FieldCapsResponse::default());
        }
        response.json()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldCapsResponse {
    pub indices: Vec<String>,
    /// Capabilities by field name, then by type.
    pub fields: HashMap<String, HashMap<String, FieldCaps>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldCaps {
    #[serde(rename = "type")]
    pub field_type: String,
    pub searchable: bool,
    pub aggregatable: bool,
    /// Indices where the field has this type, when it differs across indices.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub indices: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub non_searchable_indices: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub non_aggregatable_indices: Vec<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub meta: HashMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_decode_capabilities() {
        let transport = Arc::new(CannedTransport::new().respond(
            200,
            r#"{"indices":["index1","index2"],
                "fields":{
                    "rating":{
                        "long":{"type":"long","searchable":true,"aggregatable":false,
                                "indices":["index1"],"non_aggregatable_indices":["index1"]},
                        "keyword":{"type":"keyword","searchable":false,"aggregatable":true,
                                   "indices":["index2"],"non_searchable_indices":["index2"]}},
                    "title":{"text":{"type":"text","searchable":true,"aggregatable":false}}}}"#,
        ));
        let client = Client::new(transport.clone());
        let response = client
            .field_caps()
            .index(["index1", "index2"])
            .fields(["rating", "title"])
            .send(&Context::background())
            .await
            .unwrap();
        assert_eq!(response.indices.len(), 2);
        assert!(response.fields["rating"]["keyword"].aggregatable);
        assert_eq!(response.fields["title"]["text"].field_type, "text");

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/index1,index2/_field_caps");
        assert_eq!(request.params.get("fields"), Some("rating,title"));
    }

    #[tokio::test]
    async fn should_treat_missing_index_as_empty() {
        let client = Client::new(CannedTransport::new().respond(
            404,
            r#"{"error":{"type":"index_not_found_exception","reason":"no such index"},"status":404}"#,
        ));
        let response = client
            .field_caps()
            .index(["missing"])
            .fields(["*"])
            .send(&Context::background())
            .await
            .unwrap();
        assert_eq!(response, FieldCapsResponse::default());
    }

    #[tokio::test]
    async fn should_post_index_filter() {
        let transport = Arc::new(CannedTransport::new().respond(200, r#"{"indices":[],"fields":{}}"#));
        let client = Client::new(transport.clone());
        client
            .field_caps()
            .fields(["*"])
            .body_json(json!({"index_filter": {"range": {"@timestamp": {"gte": "2018"}}}}))
            .send(&Context::background())
            .await
            .unwrap();
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/_field_caps");
        assert_eq!(request.content_type, Some(CONTENT_TYPE_JSON));
    }
}
