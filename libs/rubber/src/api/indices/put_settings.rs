use serde_json::Value;

use crate::api::{strings, CommonParams, IndicesOptions};
use crate::client::Client;
use crate::domain::model::common::AcknowledgedResponse;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Body, Method, Params, Request, CONTENT_TYPE_JSON};
use crate::utils::path;

/// Changes dynamic settings of indices, see [`Client::indices_put_settings`].
#[derive(Debug, Clone)]
pub struct IndicesPutSettingsService {
    client: Client,
    common: CommonParams,
    options: IndicesOptions,
    index: Vec<String>,
    flat_settings: Option<bool>,
    master_timeout: Option<String>,
    preserve_existing: Option<bool>,
    timeout: Option<String>,
    body: Option<Body>,
}

impl IndicesPutSettingsService {
    pub(crate) fn new(client: Client) -> Self {
        IndicesPutSettingsService {
            client,
            common: CommonParams::default(),
            options: IndicesOptions::default(),
            index: Vec::new(),
            flat_settings: None,
            master_timeout: None,
            preserve_existing: None,
            timeout: None,
            body: None,
        }
    }

    common_setters!();
    indices_options_setters!();

    /// Without indices, the settings apply to all of them.
    pub fn index<I, S>(mut self, index: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index.extend(strings(index));
        self
    }

    pub fn flat_settings(mut self, flat_settings: bool) -> Self {
        self.flat_settings = Some(flat_settings);
        self
    }

    pub fn master_timeout(mut self, master_timeout: impl Into<String>) -> Self {
        self.master_timeout = Some(master_timeout.into());
        self
    }

    /// Leave settings which are already set untouched.
    pub fn preserve_existing(mut self, preserve_existing: bool) -> Self {
        self.preserve_existing = Some(preserve_existing);
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
        let url = if self.index.is_empty() {
            String::from("/_settings")
        } else {
            format!("/{}/_settings", path::encode_list(&self.index))
        };
        let mut params = self.common.params();
        self.options.set_params(&mut params);
        params.set_opt("flat_settings", &self.flat_settings);
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_opt("preserve_existing", &self.preserve_existing);
        params.set_opt("timeout", &self.timeout);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
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
