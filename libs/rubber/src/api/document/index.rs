use serde_json::Value;

use super::{IndexResponse, DEFAULT_TYPE};
use crate::api::CommonParams;
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Body, Method, Params, Request, CONTENT_TYPE_JSON};
use crate::utils::path;

/// Adds or replaces a document, see [`Client::index`] and [`Client::create`].
#[derive(Debug, Clone)]
pub struct IndexService {
    client: Client,
    common: CommonParams,
    index: Option<String>,
    doc_type: Option<String>,
    id: Option<String>,
    op_type: Option<String>,
    routing: Option<String>,
    parent: Option<String>,
    pipeline: Option<String>,
    refresh: Option<String>,
    wait_for_active_shards: Option<String>,
    version: Option<i64>,
    version_type: Option<String>,
    timeout: Option<String>,
    if_seq_no: Option<i64>,
    if_primary_term: Option<i64>,
    body: Option<Body>,
}

impl IndexService {
    pub(crate) fn new(client: Client) -> Self {
        IndexService {
            client,
            common: CommonParams::default(),
            index: None,
            doc_type: None,
            id: None,
            op_type: None,
            routing: None,
            parent: None,
            pipeline: None,
            refresh: None,
            wait_for_active_shards: None,
            version: None,
            version_type: None,
            timeout: None,
            if_seq_no: None,
            if_primary_term: None,
            body: None,
        }
    }

    common_setters!();

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Mapping type, `_doc` when unset.
    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Document id. Without one, the server generates it.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// `index` or `create`.
    pub fn op_type(mut self, op_type: impl Into<String>) -> Self {
        self.op_type = Some(op_type.into());
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

    pub fn pipeline(mut self, pipeline: impl Into<String>) -> Self {
        self.pipeline = Some(pipeline.into());
        self
    }

    /// `true`, `false` or `wait_for`.
    pub fn refresh(mut self, refresh: impl Into<String>) -> Self {
        self.refresh = Some(refresh.into());
        self
    }

    pub fn wait_for_active_shards(mut self, wait_for_active_shards: impl Into<String>) -> Self {
        self.wait_for_active_shards = Some(wait_for_active_shards.into());
        self
    }

    pub fn version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn version_type(mut self, version_type: impl Into<String>) -> Self {
        self.version_type = Some(version_type.into());
        self
    }

    pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    pub fn if_seq_no(mut self, seq_no: i64) -> Self {
        self.if_seq_no = Some(seq_no);
        self
    }

    pub fn if_primary_term(mut self, primary_term: i64) -> Self {
        self.if_primary_term = Some(primary_term);
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

    /// `PUT` with an explicit id, `POST` otherwise.
    pub fn method(&self) -> Method {
        if self.id.is_some() {
            Method::PUT
        } else {
            Method::POST
        }
    }

    pub fn build_url(&self) -> (String, Params) {
        let index = path::encode(self.index.as_deref().unwrap_or_default());
        let doc_type = path::encode(self.doc_type.as_deref().unwrap_or(DEFAULT_TYPE));
        let url = match &self.id {
            Some(id) => format!("/{}/{}/{}", index, doc_type, path::encode(id)),
            None => format!("/{}/{}/", index, doc_type),
        };

        let mut params = self.common.params();
        params.set_opt("op_type", &self.op_type);
        params.set_opt("routing", &self.routing);
        params.set_opt("parent", &self.parent);
        params.set_opt("pipeline", &self.pipeline);
        params.set_opt("refresh", &self.refresh);
        params.set_opt("wait_for_active_shards", &self.wait_for_active_shards);
        params.set_opt("version", &self.version);
        params.set_opt("version_type", &self.version_type);
        params.set_opt("timeout", &self.timeout);
        params.set_opt("if_seq_no", &self.if_seq_no);
        params.set_opt("if_primary_term", &self.if_primary_term);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.index.is_none() {
            missing.push("Index");
        }
        if self.body.is_none() {
            missing.push("BodyJson");
        }
        Error::check_missing(missing)
    }

    pub async fn send(&self, ctx: &Context) -> Result<IndexResponse, Error> {
        self.validate()?;
        let (url, params) = self.build_url();
        let request = Request::new(self.method(), url)
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

    #[test]
    fn should_put_when_id_is_given() {
        let client = Client::new(CannedTransport::new());
        let service = client
            .index()
            .index("tweets")
            .id("1/2")
            .refresh("wait_for")
            .version(3);
        let (url, params) = service.build_url();
        assert_eq!(service.method(), Method::PUT);
        assert_eq!(url, "/tweets/_doc/1%2F2");
        assert_eq!(params.get("refresh"), Some("wait_for"));
        assert_eq!(params.get("version"), Some("3"));
    }

    #[test]
    fn should_post_without_id() {
        let client = Client::new(CannedTransport::new());
        let service = client.index().index("tweets").doc_type("tweet");
        let (url, _) = service.build_url();
        assert_eq!(service.method(), Method::POST);
        assert_eq!(url, "/tweets/tweet/");
    }

    #[test]
    fn should_preset_create_op_type() {
        let client = Client::new(CannedTransport::new());
        let (_, params) = client.create().index("tweets").id("1").build_url();
        assert_eq!(params.get("op_type"), Some("create"));
    }

    #[test]
    fn should_report_every_missing_field() {
        let client = Client::new(CannedTransport::new());
        match client.index().validate() {
            Err(Error::MissingFields { fields }) => assert_eq!(fields, vec!["Index", "BodyJson"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn should_index_document() {
        let transport = Arc::new(CannedTransport::new().respond(
            201,
            r#"{"_index":"tweets","_type":"_doc","_id":"1","_version":1,"result":"created",
                "_shards":{"total":2,"successful":1,"failed":0},"_seq_no":0,"_primary_term":1}"#,
        ));
        let client = Client::new(transport.clone());
        let response = client
            .index()
            .index("tweets")
            .id("1")
            .body_json(json!({"user": "olivere", "message": "hello"}))
            .send(&Context::background())
            .await
            .unwrap();
        assert_eq!(response.result, "created");
        assert_eq!(response.shards.map(|s| s.successful), Some(1));

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::PUT);
        assert_eq!(
            request.body.unwrap().into_bytes().unwrap(),
            br#"{"message":"hello","user":"olivere"}"#.to_vec()
        );
    }
}
