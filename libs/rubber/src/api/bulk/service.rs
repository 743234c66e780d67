use tracing::debug;

use super::request::BulkableRequest;
use super::response::BulkResponse;
use crate::api::CommonParams;
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Body, Method, Params, Request, CONTENT_TYPE_NDJSON};
use crate::utils::path;

/// Collects bulk actions and sends them in one call, see [`Client::bulk`].
///
/// ```rust
/// use serde_json::json;
/// use rubber::adapters::secondary::canned::CannedTransport;
/// use rubber::api::bulk::{BulkDeleteRequest, BulkIndexRequest};
/// use rubber::{Client, Context};
///
/// # #[tokio::main]
/// # async fn main() {
/// let client = Client::new(CannedTransport::new().respond(200, r#"{"took":1,"errors":false,"items":[]}"#));
/// let mut bulk = client.bulk().index("tweets");
/// bulk.add(BulkIndexRequest::new().id("1").doc(json!({"user": "olivere"})))
///     .add(BulkDeleteRequest::new().id("2"));
/// assert_eq!(bulk.number_of_actions(), 2);
/// let response = bulk.send(&Context::background()).await.unwrap();
/// assert!(!response.errors);
/// assert_eq!(bulk.number_of_actions(), 0);
/// # }
/// ```
pub struct BulkService {
    client: Client,
    common: CommonParams,
    index: Option<String>,
    doc_type: Option<String>,
    pipeline: Option<String>,
    refresh: Option<String>,
    routing: Option<String>,
    timeout: Option<String>,
    wait_for_active_shards: Option<String>,
    requests: Vec<Box<dyn BulkableRequest>>,
    size_in_bytes: usize,
    // Number of requests already counted in size_in_bytes.
    size_cursor: usize,
}

impl BulkService {
    pub(crate) fn new(client: Client) -> Self {
        BulkService {
            client,
            common: CommonParams::default(),
            index: None,
            doc_type: None,
            pipeline: None,
            refresh: None,
            routing: None,
            timeout: None,
            wait_for_active_shards: None,
            requests: Vec::new(),
            size_in_bytes: 0,
            size_cursor: 0,
        }
    }

    common_setters!();

    /// Default index for actions which do not name one.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Default type for actions which do not name one.
    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
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

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    pub fn wait_for_active_shards(mut self, wait_for_active_shards: impl Into<String>) -> Self {
        self.wait_for_active_shards = Some(wait_for_active_shards.into());
        self
    }

    /// Queues an action.
    pub fn add<R: BulkableRequest + 'static>(&mut self, request: R) -> &mut Self {
        self.requests.push(Box::new(request));
        self
    }

    pub fn number_of_actions(&self) -> usize {
        self.requests.len()
    }

    /// Size of the body which would be sent now. Only actions added since the
    /// previous call are encoded.
    pub fn estimated_size_in_bytes(&mut self) -> usize {
        for request in &mut self.requests[self.size_cursor..] {
            if let Ok(lines) = request.source() {
                self.size_in_bytes += lines.iter().map(|line| line.len() + 1).sum::<usize>();
            }
        }
        self.size_cursor = self.requests.len();
        self.size_in_bytes
    }

    /// Drops every queued action.
    pub fn reset(&mut self) {
        self.requests.clear();
        self.size_in_bytes = 0;
        self.size_cursor = 0;
    }

    /// The NDJSON body, each line terminated by a newline.
    pub fn body_as_string(&mut self) -> Result<String, Error> {
        let mut body = String::new();
        for request in &mut self.requests {
            for line in request.source()? {
                body.push_str(&line);
                body.push('\n');
            }
        }
        Ok(body)
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = match (&self.index, &self.doc_type) {
            (Some(index), Some(doc_type)) => {
                format!("/{}/{}/_bulk", path::encode(index), path::encode(doc_type))
            }
            (Some(index), None) => format!("/{}/_bulk", path::encode(index)),
            _ => String::from("/_bulk"),
        };
        let mut params = self.common.params();
        params.set_opt("pipeline", &self.pipeline);
        params.set_opt("refresh", &self.refresh);
        params.set_opt("routing", &self.routing);
        params.set_opt("timeout", &self.timeout);
        params.set_opt("wait_for_active_shards", &self.wait_for_active_shards);
        (url, params)
    }

    /// Sends the queued actions, and drops them once the call succeeded.
    ///
    /// A successful call may still carry failed items, see
    /// [`BulkResponse::failed`].
    pub async fn send(&mut self, ctx: &Context) -> Result<BulkResponse, Error> {
        if self.requests.is_empty() {
            return Err(Error::NoBulkActions);
        }
        let body = self.body_as_string()?;
        let (url, params) = self.build_url();
        debug!(
            "sending {} bulk actions ({} bytes)",
            self.requests.len(),
            body.len()
        );
        let request = Request::new(Method::POST, url)
            .params(params)
            .body(Some(Body::Raw(body)))
            .content_type(CONTENT_TYPE_NDJSON)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        let response: BulkResponse = response.json()?;
        self.reset();
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use crate::api::bulk::{BulkCreateRequest, BulkDeleteRequest, BulkIndexRequest};
    use serde_json::json;
    use std::sync::Arc;

    fn tweets(client: &Client) -> BulkService {
        let mut bulk = client.bulk();
        bulk.add(
            BulkIndexRequest::new()
                .index("tweets")
                .id("1")
                .doc(json!({"user": "olivere"})),
        )
        .add(BulkCreateRequest::new().index("tweets").id("2").doc_raw(r#"{"user":"sandrae"}"#))
        .add(BulkDeleteRequest::new().index("tweets").id("3"));
        bulk
    }

    #[test]
    fn should_build_ndjson_body() {
        let client = Client::new(CannedTransport::new());
        let mut bulk = tweets(&client);
        assert_eq!(
            bulk.body_as_string().unwrap(),
            concat!(
                "{\"index\":{\"_index\":\"tweets\",\"_id\":\"1\"}}\n",
                "{\"user\":\"olivere\"}\n",
                "{\"create\":{\"_index\":\"tweets\",\"_id\":\"2\"}}\n",
                "{\"user\":\"sandrae\"}\n",
                "{\"delete\":{\"_index\":\"tweets\",\"_id\":\"3\"}}\n",
            )
        );
    }

    #[test]
    fn should_estimate_size_incrementally() {
        let client = Client::new(CannedTransport::new());
        let mut bulk = tweets(&client);
        let body = bulk.body_as_string().unwrap();
        assert_eq!(bulk.estimated_size_in_bytes(), body.len());

        bulk.add(BulkDeleteRequest::new().index("tweets").id("4"));
        let body = bulk.body_as_string().unwrap();
        assert_eq!(bulk.estimated_size_in_bytes(), body.len());

        bulk.reset();
        assert_eq!(bulk.estimated_size_in_bytes(), 0);
        assert_eq!(bulk.number_of_actions(), 0);
    }

    #[test]
    fn should_pick_path_from_defaults() {
        let client = Client::new(CannedTransport::new());
        assert_eq!(client.bulk().build_url().0, "/_bulk");
        assert_eq!(client.bulk().index("tweets").build_url().0, "/tweets/_bulk");
        let (url, params) = client
            .bulk()
            .index("tweets")
            .doc_type("doc")
            .refresh("wait_for")
            .build_url();
        assert_eq!(url, "/tweets/doc/_bulk");
        assert_eq!(params.get("refresh"), Some("wait_for"));
        // A type without an index is ignored.
        assert_eq!(client.bulk().doc_type("doc").build_url().0, "/_bulk");
    }

    #[tokio::test]
    async fn should_refuse_to_send_nothing() {
        let transport = Arc::new(CannedTransport::new());
        let client = Client::new(transport.clone());
        let err = client.bulk().send(&Context::background()).await.unwrap_err();
        assert!(matches!(err, Error::NoBulkActions));
        assert_eq!(err.to_string(), "elastic: No bulk actions to commit");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn should_send_and_reset() {
        let transport = Arc::new(CannedTransport::new().respond(
            200,
            r#"{"took":3,"errors":false,"items":[
                {"index":{"_index":"tweets","_id":"1","status":201}},
                {"create":{"_index":"tweets","_id":"2","status":201}},
                {"delete":{"_index":"tweets","_id":"3","status":200}}]}"#,
        ));
        let client = Client::new(transport.clone());
        let mut bulk = tweets(&client);
        let expected = bulk.body_as_string().unwrap();
        let response = bulk.send(&Context::background()).await.unwrap();
        assert_eq!(response.items.len(), 3);
        assert_eq!(bulk.number_of_actions(), 0);

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.content_type, Some(CONTENT_TYPE_NDJSON));
        assert_eq!(request.body, Some(Body::Raw(expected)));
    }

    #[tokio::test]
    async fn should_keep_actions_when_send_fails() {
        let client = Client::new(CannedTransport::new().respond(503, ""));
        let mut bulk = tweets(&client);
        let err = bulk.send(&Context::background()).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(bulk.number_of_actions(), 3);
    }
}
