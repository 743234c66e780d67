use serde_json::Value;

use crate::api::CommonParams;
use crate::client::Client;
use crate::domain::model::common::AcknowledgedResponse;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Body, Method, Params, Request, CONTENT_TYPE_JSON};
use crate::utils::path;

/// Creates or updates a component template, see
/// [`Client::cluster_put_component_template`].
#[derive(Debug, Clone)]
pub struct ClusterPutComponentTemplateService {
    client: Client,
    common: CommonParams,
    name: Option<String>,
    create: Option<bool>,
    master_timeout: Option<String>,
    timeout: Option<String>,
    body: Option<Body>,
}

impl ClusterPutComponentTemplateService {
    pub(crate) fn new(client: Client) -> Self {
        ClusterPutComponentTemplateService {
            client,
            common: CommonParams::default(),
            name: None,
            create: None,
            master_timeout: None,
            timeout: None,
            body: None,
        }
    }

    common_setters!();

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Fail instead of replacing an existing template.
    pub fn create(mut self, create: bool) -> Self {
        self.create = Some(create);
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

    pub fn body_json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    pub fn body_string(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = format!(
            "/_component_template/{}",
            path::encode(self.name.as_deref().unwrap_or_default())
        );
        let mut params = self.common.params();
        params.set_opt("create", &self.create);
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_opt("timeout", &self.timeout);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("Name");
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
    async fn should_put_component_template() {
        let transport = Arc::new(CannedTransport::new().respond(200, r#"{"acknowledged":true}"#));
        let client = Client::new(transport.clone());
        let response = client
            .cluster_put_component_template()
            .name("logs-settings")
            .create(true)
            .body_json(json!({"template": {"settings": {"number_of_shards": 1}}}))
            .send(&Context::background())
            .await
            .unwrap();
        assert!(response.acknowledged);

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path, "/_component_template/logs-settings");
        assert_eq!(request.params.get("create"), Some("true"));
    }

    #[tokio::test]
    async fn should_not_send_without_name_and_body() {
        let transport = Arc::new(CannedTransport::new());
        let client = Client::new(transport.clone());
        let err = client
            .cluster_put_component_template()
            .send(&Context::background())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), r#"missing required fields: ["Name", "BodyJson"]"#);
        assert!(transport.requests().is_empty());
    }
}
