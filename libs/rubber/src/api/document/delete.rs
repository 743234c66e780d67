use super::{DeleteResponse, DEFAULT_TYPE};
use crate::api::CommonParams;
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::{Error, ErrorDetails};
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Removes a document by id, see [`Client::delete`].
///
/// A missing document is reported as an [`Error::Elastic`] with status 404,
/// which [`Error::is_not_found`] recognizes. Its details carry the index and
/// id from the server reply.
#[derive(Debug, Clone)]
pub struct DeleteService {
    client: Client,
    common: CommonParams,
    index: Option<String>,
    doc_type: Option<String>,
    id: Option<String>,
    routing: Option<String>,
    parent: Option<String>,
    refresh: Option<String>,
    timeout: Option<String>,
    version: Option<i64>,
    version_type: Option<String>,
    wait_for_active_shards: Option<String>,
    if_seq_no: Option<i64>,
    if_primary_term: Option<i64>,
}

impl DeleteService {
    pub(crate) fn new(client: Client) -> Self {
        DeleteService {
            client,
            common: CommonParams::default(),
            index: None,
            doc_type: None,
            id: None,
            routing: None,
            parent: None,
            refresh: None,
            timeout: None,
            version: None,
            version_type: None,
            wait_for_active_shards: None,
            if_seq_no: None,
            if_primary_term: None,
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

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn refresh(mut self, refresh: impl Into<String>) -> Self {
        self.refresh = Some(refresh.into());
        self
    }

    pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
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

    pub fn wait_for_active_shards(mut self, wait_for_active_shards: impl Into<String>) -> Self {
        self.wait_for_active_shards = Some(wait_for_active_shards.into());
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

    pub fn build_url(&self) -> (String, Params) {
        let url = format!(
            "/{}/{}/{}",
            path::encode(self.index.as_deref().unwrap_or_default()),
            path::encode(self.doc_type.as_deref().unwrap_or(DEFAULT_TYPE)),
            path::encode(self.id.as_deref().unwrap_or_default()),
        );
        let mut params = self.common.params();
        params.set_opt("routing", &self.routing);
        params.set_opt("parent", &self.parent);
        params.set_opt("refresh", &self.refresh);
        params.set_opt("timeout", &self.timeout);
        params.set_opt("version", &self.version);
        params.set_opt("version_type", &self.version_type);
        params.set_opt("wait_for_active_shards", &self.wait_for_active_shards);
        params.set_opt("if_seq_no", &self.if_seq_no);
        params.set_opt("if_primary_term", &self.if_primary_term);
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

    pub async fn send(&self, ctx: &Context) -> Result<DeleteResponse, Error> {
        self.validate()?;
        let (url, params) = self.build_url();
        let request = Request::new(Method::DELETE, url)
            .params(params)
            .headers(self.common.headers.clone())
            .ignore_errors(&[404]);
        let response = self.client.perform_request(ctx, request).await?;
        if response.status == 404 {
            return Err(not_found(&response.body));
        }
        response.json()
    }
}

// A 404 body is either an error payload (missing index), or a write reply
// with `result: not_found` (missing document).
fn not_found(body: &[u8]) -> Error {
    let err = Error::from_response(404, body);
    if err.details().is_some() {
        return err;
    }
    match serde_json::from_slice::<DeleteResponse>(body) {
        Ok(reply) if reply.result == "not_found" => Error::Elastic {
            status: 404,
            details: Some(Box::new(ErrorDetails {
                reason: format!("document [{}] not found in [{}]", reply.id, reply.index),
                error_type: reply.result,
                resource_id: Some(reply.id),
                index: Some(reply.index),
                ..ErrorDetails::default()
            })),
        },
        _ => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_delete_document() {
        let transport = Arc::new(CannedTransport::new().respond(
            200,
            r#"{"_index":"tweets","_type":"_doc","_id":"1","_version":2,"result":"deleted","_seq_no":3,"_primary_term":1}"#,
        ));
        let client = Client::new(transport.clone());
        let response = client
            .delete()
            .index("tweets")
            .id("1")
            .refresh("true")
            .send(&Context::background())
            .await
            .unwrap();
        assert_eq!(response.result, "deleted");
        assert_eq!(response.seq_no, 3);

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path, "/tweets/_doc/1");
        assert_eq!(request.params.get("refresh"), Some("true"));
    }

    #[tokio::test]
    async fn should_report_missing_document_as_not_found() {
        let client = Client::new(CannedTransport::new().respond(
            404,
            r#"{"_index":"tweets","_type":"_doc","_id":"1","_version":1,"result":"not_found"}"#,
        ));
        let err = client
            .delete()
            .index("tweets")
            .id("1")
            .send(&Context::background())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        let details = err.details().unwrap();
        assert_eq!(details.error_type, "not_found");
        assert_eq!(details.index.as_deref(), Some("tweets"));
        assert_eq!(details.resource_id.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn should_keep_error_payload_of_missing_index() {
        let client = Client::new(CannedTransport::new().respond(
            404,
            r#"{"error":{"type":"index_not_found_exception","reason":"no such index [tweets]","index":"tweets"},"status":404}"#,
        ));
        let err = client
            .delete()
            .index("tweets")
            .id("1")
            .send(&Context::background())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.details().map(|d| d.error_type.as_str()),
            Some("index_not_found_exception")
        );
    }

    #[test]
    fn should_require_index_and_id() {
        let client = Client::new(CannedTransport::new());
        match client.delete().validate() {
            Err(Error::MissingFields { fields }) => assert_eq!(fields, vec!["Index", "Id"]),
            other => panic!("unexpected {:?}", other),
        }
    }
}
