use super::DEFAULT_TYPE;
use crate::api::{existence, CommonParams};
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Checks whether a document exists, see [`Client::exists`].
#[derive(Debug, Clone)]
pub struct ExistsService {
    client: Client,
    common: CommonParams,
    index: Option<String>,
    doc_type: Option<String>,
    id: Option<String>,
    realtime: Option<bool>,
    refresh: Option<String>,
    routing: Option<String>,
    parent: Option<String>,
    preference: Option<String>,
}

impl ExistsService {
    pub(crate) fn new(client: Client) -> Self {
        ExistsService {
            client,
            common: CommonParams::default(),
            index: None,
            doc_type: None,
            id: None,
            realtime: None,
            refresh: None,
            routing: None,
            parent: None,
            preference: None,
        }
    }

    common_setters!();

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = Some(realtime);
        self
    }

    pub fn refresh(mut self, refresh: impl Into<String>) -> Self {
        self.refresh = Some(refresh.into());
        self
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn preference(mut self, preference: impl Into<String>) -> Self {
        self.preference = Some(preference.into());
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = format!(
            "/{}/{}/{}",
            path::encode(self.index.as_deref().unwrap_or_default()),
            path::encode(self.doc_type.as_deref().unwrap_or(DEFAULT_TYPE)),
            path::encode(self.id.as_deref().unwrap_or_default()),
        );
        let mut params = self.common.params();
        params.set_opt("realtime", &self.realtime);
        params.set_opt("refresh", &self.refresh);
        params.set_opt("routing", &self.routing);
        params.set_opt("parent", &self.parent);
        params.set_opt("preference", &self.preference);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.index.is_none() {
            missing.push("Index");
        }
        if self.id.is_none() {
            missing.push("Id");
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
    async fn should_map_status_to_existence() {
        let transport = Arc::new(CannedTransport::new().respond(200, "").respond(404, ""));
        let client = Client::new(transport.clone());
        let service = client.exists().index("tweets").id("1").routing("u1");
        assert!(service.send(&Context::background()).await.unwrap());
        assert!(!service.send(&Context::background()).await.unwrap());

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::HEAD);
        assert_eq!(request.path, "/tweets/_doc/1");
        assert_eq!(request.params.get("routing"), Some("u1"));
    }

    #[tokio::test]
    async fn should_fail_on_other_statuses() {
        let client = Client::new(CannedTransport::new().respond(500, "").respond(204, ""));
        let service = client.exists().index("tweets").id("1");
        let err = service.send(&Context::background()).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        let err = service.send(&Context::background()).await.unwrap_err();
        assert!(matches!(err, Error::UnexpectedStatus { status: 204 }));
    }
}
