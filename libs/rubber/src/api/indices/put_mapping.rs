use serde_json::Value;

use crate::api::{strings, CommonParams, IndicesOptions};
use crate::client::Client;
use crate::domain::model::common::AcknowledgedResponse;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Body, Method, Params, Request, CONTENT_TYPE_JSON};
use crate::utils::path;

/// Adds fields to the mapping of indices, see [`Client::indices_put_mapping`].
#[derive(Debug, Clone)]
pub struct IndicesPutMappingService {
    client: Client,
    common: CommonParams,
    options: IndicesOptions,
    index: Vec<String>,
    timeout: Option<String>,
    master_timeout: Option<String>,
    write_index_only: Option<bool>,
    include_type_name: Option<bool>,
    body: Option<Body>,
}

impl IndicesPutMappingService {
    pub(crate) fn new(client: Client) -> Self {
        IndicesPutMappingService {
            client,
            common: CommonParams::default(),
            options: IndicesOptions::default(),
            index: Vec::new(),
            timeout: None,
            master_timeout: None,
            write_index_only: None,
            include_type_name: None,
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

    pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    pub fn master_timeout(mut self, master_timeout: impl Into<String>) -> Self {
        self.master_timeout = Some(master_timeout.into());
        self
    }

    /// Only update the write index of an alias.
    pub fn write_index_only(mut self, write_index_only: bool) -> Self {
        self.write_index_only = Some(write_index_only);
        self
    }

    pub fn include_type_name(mut self, include_type_name: bool) -> Self {
        self.include_type_name = Some(include_type_name);
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
        let url = format!("/{}/_mapping", path::encode_list(&self.index));
        let mut params = self.common.params();
        self.options.set_params(&mut params);
        params.set_opt("timeout", &self.timeout);
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_opt("write_index_only", &self.write_index_only);
        params.set_opt("include_type_name", &self.include_type_name);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.index.is_empty() {
            missing.push("Index");
        }
        if self.body.is_none() {
            missing.push("BodyJson");
        }
        Error::check_missing(missing)
    }

    pub async fn send(&self, ctx: &Context) -> Result<AcknowledgedResponse, Error> {
        self.validate()?;
        let (url, params) = self.build_url();
        let request = Request::new(Method::PUT, url)
            .params(params)
            .body(self.body.clone())
            .content_type(CONTENT_TYPE_JSON)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_put_mapping() {
        let transport = Arc::new(CannedTransport::new().respond(200, r#"{"acknowledged":true}"#));
        let client = Client::new(transport.clone());
        let response = client
            .indices_put_mapping()
            .index(["twitter"])
            .body_json(json!({"properties": {"message": {"type": "text"}}}))
            .send(&Context::background())
            .await
            .unwrap();
        assert!(response.acknowledged);
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path, "/twitter/_mapping");
    }

    #[test]
    fn should_list_missing_fields() {
        let client = Client::new(CannedTransport::new());
        match client.indices_put_mapping().validate() {
            Err(Error::MissingFields { fields }) => assert_eq!(fields, vec!["Index", "BodyJson"]),
            other => panic!("unexpected {:?}", other),
        }
    }
}
