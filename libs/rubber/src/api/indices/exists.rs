use crate::api::{existence, strings, CommonParams, IndicesOptions};
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Checks whether indices exist, see [`Client::indices_exists`].
#[derive(Debug, Clone)]
pub struct IndicesExistsService {
    client: Client,
    common: CommonParams,
    options: IndicesOptions,
    index: Vec<String>,
    local: Option<bool>,
    include_defaults: Option<bool>,
}

impl IndicesExistsService {
    pub(crate) fn new(client: Client) -> Self {
        IndicesExistsService {
            client,
            common: CommonParams::default(),
            options: IndicesOptions::default(),
            index: Vec::new(),
            local: None,
            include_defaults: None,
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

    pub fn local(mut self, local: bool) -> Self {
        self.local = Some(local);
        self
    }

    pub fn include_defaults(mut self, include_defaults: bool) -> Self {
        self.include_defaults = Some(include_defaults);
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = format!("/{}", path::encode_list(&self.index));
        let mut params = self.common.params();
        self.options.set_params(&mut params);
        params.set_opt("local", &self.local);
        params.set_opt("include_defaults", &self.include_defaults);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.index.is_empty() {
            missing.push("Index");
        }
        Error::check_missing(missing)
    }

    pub async fn send(&self, ctx: &Context) -> Result<bool, Error> {
        self.validate()?;
        let (url, params) = self.build_url();
        let request = Request::new(Method::HEAD, url)
            .params(params)
            .headers(self.common.headers.clone())
            .ignore_errors(&[404]);
        let response = self.client.perform_request(ctx, request).await?;
        existence(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_check_indices() {
        let transport = Arc::new(CannedTransport::new().respond(200, "").respond(404, ""));
        let client = Client::new(transport.clone());
        let service = client
            .indices_exists()
            .index(["twitter", "facebook"])
            .expand_wildcards("open")
            .ignore_unavailable(false);
        assert!(service.send(&Context::background()).await.unwrap());
        assert!(!service.send(&Context::background()).await.unwrap());

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::HEAD);
        assert_eq!(request.path, "/twitter,facebook");
        assert_eq!(request.params.get("ignore_unavailable"), Some("false"));
        assert_eq!(request.params.get("expand_wildcards"), Some("open"));
    }

    #[tokio::test]
    async fn should_require_index() {
        let client = Client::new(CannedTransport::new());
        let err = client
            .indices_exists()
            .send(&Context::background())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingFields { .. }));
    }
}
