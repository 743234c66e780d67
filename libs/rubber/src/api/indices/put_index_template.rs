use serde_json::Value;

use crate::api::CommonParams;
use crate::client::Client;
use crate::domain::model::common::AcknowledgedResponse;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Body, Method, Params, Request, CONTENT_TYPE_JSON};
use crate::utils::path;

/// Creates or updates a composable index template, see
/// [`Client::indices_put_index_template`].
#[derive(Debug, Clone)]
pub struct IndicesPutIndexTemplateService {
    client: Client,
    common: CommonParams,
    name: Option<String>,
    create: Option<bool>,
    cause: Option<String>,
    master_timeout: Option<String>,
    body: Option<Body>,
}

impl IndicesPutIndexTemplateService {
    pub(crate) fn new(client: Client) -> Self {
        IndicesPutIndexTemplateService {
            client,
            common: CommonParams::default(),
            name: None,
            create: None,
            cause: None,
            master_timeout: None,
            body: None,
        }
    }

    common_setters!();

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn create(mut self, create: bool) -> Self {
        self.create = Some(create);
        self
    }

    /// Free text recorded as the reason of the change.
    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn master_timeout(mut self, master_timeout: impl Into<String>) -> Self {
        self.master_timeout = Some(master_timeout.into());
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
            "/_index_template/{}",
            path::encode(self.name.as_deref().unwrap_or_default())
        );
        let mut params = self.common.params();
        params.set_opt("create", &self.create);
        params.set_opt("cause", &self.cause);
        params.set_opt("master_timeout", &self.master_timeout);
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
