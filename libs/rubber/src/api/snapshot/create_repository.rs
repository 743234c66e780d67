use serde_json::{json, Map, Value};

use crate::api::CommonParams;
use crate::client::Client;
use crate::domain::model::common::AcknowledgedResponse;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Body, Method, Params, Request, CONTENT_TYPE_JSON};
use crate::utils::path;

/// Registers a snapshot repository, see [`Client::snapshot_create_repository`].
///
/// The body is either given whole, or built from [`type_`](Self::type_) and
/// [`setting`](Self::setting).
#[derive(Debug, Clone)]
pub struct SnapshotCreateRepositoryService {
    client: Client,
    common: CommonParams,
    repository: Option<String>,
    master_timeout: Option<String>,
    timeout: Option<String>,
    verify: Option<bool>,
    repository_type: Option<String>,
    settings: Map<String, Value>,
    body: Option<Body>,
}

impl SnapshotCreateRepositoryService {
    pub(crate) fn new(client: Client) -> Self {
        SnapshotCreateRepositoryService {
            client,
            common: CommonParams::default(),
            repository: None,
            master_timeout: None,
            timeout: None,
            verify: None,
            repository_type: None,
            settings: Map::new(),
            body: None,
        }
    }

    common_setters!();

    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
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

    /// Checks that every node can access the repository once registered.
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = Some(verify);
        self
    }

    /// Repository type, e.g. `fs` or `url`.
    pub fn type_(mut self, repository_type: impl Into<String>) -> Self {
        self.repository_type = Some(repository_type.into());
        self
    }

    /// Replaces every repository setting.
    pub fn settings(mut self, settings: Map<String, Value>) -> Self {
        self.settings = settings;
        self
    }

    pub fn setting(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(name.into(), value.into());
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
            "/_snapshot/{}",
            path::encode(self.repository.as_deref().unwrap_or_default())
        );
        let mut params = self.common.params();
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_opt("timeout", &self.timeout);
        params.set_opt("verify", &self.verify);
        (url, params)
    }

    /// The explicit body if any, otherwise `{"type": .., "settings": ..}`.
    pub fn build_body(&self) -> Body {
        if let Some(body) = &self.body {
            return body.clone();
        }
        let mut body = Map::new();
        if let Some(repository_type) = &self.repository_type {
            body.insert(String::from("type"), json!(repository_type));
        }
        if !self.settings.is_empty() {
            body.insert(String::from("settings"), Value::Object(self.settings.clone()));
        }
        Body::Json(Value::Object(body))
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.repository.is_none() {
            missing.push("Repository");
        }
        if self.body.is_none() && self.repository_type.is_none() {
            missing.push("Type");
        }
        Error::check_missing(missing)
    }

    pub async fn send(&self, ctx: &Context) -> Result<AcknowledgedResponse, Error> {
        self.validate()?;
        let (url, params) = self.build_url();
        let request = Request::new(Method::PUT, url)
            .params(params)
            .body(Some(self.build_body()))
            .content_type(CONTENT_TYPE_JSON)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}
