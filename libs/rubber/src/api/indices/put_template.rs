use serde_json::Value;

use crate::api::CommonParams;
use crate::client::Client;
use crate::domain::model::common::AcknowledgedResponse;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Body, Method, Params, Request, CONTENT_TYPE_JSON};
use crate::utils::path;

/// Creates or updates a legacy index template, see
/// [`Client::indices_put_template`].
#[derive(Debug, Clone)]
pub struct IndicesPutTemplateService {
    client: Client,
    common: CommonParams,
    name: Option<String>,
    order: Option<i64>,
    create: Option<bool>,
    timeout: Option<String>,
    master_timeout: Option<String>,
    flat_settings: Option<bool>,
    include_type_name: Option<bool>,
    body: Option<Body>,
}

impl IndicesPutTemplateService {
    pub(crate) fn new(client: Client) -> Self {
        IndicesPutTemplateService {
            client,
            common: CommonParams::default(),
            name: None,
            order: None,
            create: None,
            timeout: None,
            master_timeout: None,
            flat_settings: None,
            include_type_name: None,
            body: None,
        }
    }

    common_setters!();

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Templates with a higher order are merged last.
    pub fn order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn create(mut self, create: bool) -> Self {
        self.create = Some(create);
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

    pub fn flat_settings(mut self, flat_settings: bool) -> Self {
        self.flat_settings = Some(flat_settings);
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
        let url = format!(
            "/_template/{}",
            path::encode(self.name.as_deref().unwrap_or_default())
        );
        let mut params = self.common.params();
        params.set_opt("order", &self.order);
        params.set_opt("create", &self.create);
        params.set_opt("timeout", &self.timeout);
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_opt("flat_settings", &self.flat_settings);
        params.set_opt("include_type_name", &self.include_type_name);
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
