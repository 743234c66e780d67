use serde::Serialize;
use serde_json::Value;
use snafu::ResultExt;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::model::error::{Error, InvalidSourceSnafu, SerializationSnafu};

/// A request that can be added to a [`BulkService`](super::BulkService).
pub trait BulkableRequest: fmt::Display + Send {
    /// The NDJSON lines of this action, without trailing newlines.
    fn source(&mut self) -> Result<Vec<String>, Error>;
}

/// Metadata line of a bulk action. Unset fields are left out, and the
/// remaining ones keep this order.
#[derive(Debug, Default, Serialize)]
struct BulkCommandOp<'a> {
    #[serde(rename = "_index", skip_serializing_if = "Option::is_none")]
    index: Option<&'a str>,
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    doc_type: Option<&'a str>,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    routing: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_on_conflict: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pipeline: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    if_seq_no: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    if_primary_term: Option<i64>,
}

impl<'a> BulkCommandOp<'a> {
    fn to_line(&self, op: &str) -> Result<String, Error> {
        let mut command = BTreeMap::new();
        command.insert(op, self);
        serde_json::to_string(&command).context(SerializationSnafu {
            details: format!("cannot serialize bulk {} metadata", op),
        })
    }

    /// Writes the same bytes as [`BulkCommandOp::to_line`], field by field.
    fn write_line(&self, op: &str) -> String {
        let mut writer = LineWriter::new(op);
        writer.text("_index", self.index);
        writer.text("_type", self.doc_type);
        writer.text("_id", self.id);
        writer.text("parent", self.parent);
        writer.text("routing", self.routing);
        writer.number("version", self.version);
        writer.text("version_type", self.version_type);
        writer.number("retry_on_conflict", self.retry_on_conflict);
        writer.text("pipeline", self.pipeline);
        writer.number("if_seq_no", self.if_seq_no);
        writer.number("if_primary_term", self.if_primary_term);
        writer.finish()
    }
}

struct LineWriter {
    line: String,
    empty: bool,
}

impl LineWriter {
    fn new(op: &str) -> Self {
        let mut line = String::with_capacity(128);
        line.push_str("{\"");
        line.push_str(op);
        line.push_str("\":{");
        LineWriter { line, empty: true }
    }

    fn key(&mut self, key: &str) {
        if !self.empty {
            self.line.push(',');
        }
        self.empty = false;
        self.line.push('"');
        self.line.push_str(key);
        self.line.push_str("\":");
    }

    fn text(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.key(key);
            // Escaping a str cannot fail.
            if let Ok(quoted) = serde_json::to_string(value) {
                self.line.push_str(&quoted);
            }
        }
    }

    fn number<T: fmt::Display>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.key(key);
            self.line.push_str(&value.to_string());
        }
    }

    fn finish(mut self) -> String {
        self.line.push_str("}}");
        self.line
    }
}

/// The document line of an index or create action.
#[derive(Debug, Clone, PartialEq)]
pub enum Doc {
    Json(Value),
    /// Sent verbatim.
    Raw(String),
    /// Sent verbatim, must be UTF-8.
    Bytes(Vec<u8>),
}

impl Doc {
    fn to_line(&self) -> Result<String, Error> {
        match self {
            Doc::Json(value) => serde_json::to_string(value).context(SerializationSnafu {
                details: String::from("cannot serialize bulk document"),
            }),
            Doc::Raw(raw) => Ok(raw.clone()),
            Doc::Bytes(bytes) => String::from_utf8(bytes.clone()).map_err(|err| {
                InvalidSourceSnafu {
                    details: format!("document is not valid UTF-8: {}", err),
                }
                .build()
            }),
        }
    }
}

fn doc_line(doc: &Option<Doc>) -> Result<String, Error> {
    match doc {
        Some(doc) => doc.to_line(),
        None => Ok(String::from("{}")),
    }
}

fn display_lines(
    f: &mut fmt::Formatter<'_>,
    lines: Result<Vec<String>, Error>,
) -> fmt::Result {
    match lines {
        Ok(lines) => write!(f, "{}", lines.join("\n")),
        Err(err) => write!(f, "error: {}", err),
    }
}

/// Adds or replaces a document in a bulk request.
///
/// The `op_type` is `index` unless set to `create`.
#[derive(Debug, Clone)]
pub struct BulkIndexRequest {
    op_type: String,
    index: Option<String>,
    doc_type: Option<String>,
    id: Option<String>,
    parent: Option<String>,
    routing: Option<String>,
    version: Option<i64>,
    version_type: Option<String>,
    retry_on_conflict: Option<u32>,
    pipeline: Option<String>,
    if_seq_no: Option<i64>,
    if_primary_term: Option<i64>,
    doc: Option<Doc>,
    fast_encoder: bool,
    source: Option<Vec<String>>,
}

impl Default for BulkIndexRequest {
    fn default() -> Self {
        BulkIndexRequest {
            op_type: String::from("index"),
            index: None,
            doc_type: None,
            id: None,
            parent: None,
            routing: None,
            version: None,
            version_type: None,
            retry_on_conflict: None,
            pipeline: None,
            if_seq_no: None,
            if_primary_term: None,
            doc: None,
            fast_encoder: false,
            source: None,
        }
    }
}

impl BulkIndexRequest {
    pub fn new() -> Self {
        BulkIndexRequest::default()
    }

    pub fn op_type(mut self, op_type: impl Into<String>) -> Self {
        self.op_type = op_type.into();
        self.source = None;
        self
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self.source = None;
        self
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self.source = None;
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self.source = None;
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self.source = None;
        self
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self.source = None;
        self
    }

    pub fn version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self.source = None;
        self
    }

    pub fn version_type(mut self, version_type: impl Into<String>) -> Self {
        self.version_type = Some(version_type.into());
        self.source = None;
        self
    }

    pub fn retry_on_conflict(mut self, retry_on_conflict: u32) -> Self {
        self.retry_on_conflict = Some(retry_on_conflict);
        self.source = None;
        self
    }

    pub fn pipeline(mut self, pipeline: impl Into<String>) -> Self {
        self.pipeline = Some(pipeline.into());
        self.source = None;
        self
    }

    // NOTE: unlike the other setters, these two leave an already computed
    // source in place, so a request encoded before they are called keeps
    // its old metadata line.
    pub fn if_seq_no(mut self, seq_no: i64) -> Self {
        self.if_seq_no = Some(seq_no);
        self
    }

    pub fn if_primary_term(mut self, primary_term: i64) -> Self {
        self.if_primary_term = Some(primary_term);
        self
    }

    pub fn doc(mut self, doc: Value) -> Self {
        self.doc = Some(Doc::Json(doc));
        self.source = None;
        self
    }

    pub fn doc_raw(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(Doc::Raw(doc.into()));
        self.source = None;
        self
    }

    pub fn doc_bytes(mut self, doc: impl Into<Vec<u8>>) -> Self {
        self.doc = Some(Doc::Bytes(doc.into()));
        self.source = None;
        self
    }

    /// Switches to the hand-written metadata encoder.
    pub fn use_fast_encoder(mut self, enable: bool) -> Self {
        self.fast_encoder = enable;
        self.source = None;
        self
    }

    fn command(&self) -> BulkCommandOp<'_> {
        BulkCommandOp {
            index: self.index.as_deref(),
            doc_type: self.doc_type.as_deref(),
            id: self.id.as_deref(),
            parent: self.parent.as_deref(),
            routing: self.routing.as_deref(),
            version: self.version,
            version_type: self.version_type.as_deref(),
            retry_on_conflict: self.retry_on_conflict,
            pipeline: self.pipeline.as_deref(),
            if_seq_no: self.if_seq_no,
            if_primary_term: self.if_primary_term,
        }
    }

    fn encode(&self) -> Result<Vec<String>, Error> {
        let command = self.command();
        let meta = if self.fast_encoder {
            command.write_line(&self.op_type)
        } else {
            command.to_line(&self.op_type)?
        };
        Ok(vec![meta, doc_line(&self.doc)?])
    }
}

impl BulkableRequest for BulkIndexRequest {
    fn source(&mut self) -> Result<Vec<String>, Error> {
        if let Some(source) = &self.source {
            return Ok(source.clone());
        }
        let lines = self.encode()?;
        self.source = Some(lines.clone());
        Ok(lines)
    }
}

impl fmt::Display for BulkIndexRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_lines(f, self.encode())
    }
}

/// Adds a document in a bulk request, failing if it already exists.
#[derive(Debug, Clone)]
pub struct BulkCreateRequest(BulkIndexRequest);

impl Default for BulkCreateRequest {
    fn default() -> Self {
        BulkCreateRequest(BulkIndexRequest::new().op_type("create"))
    }
}

impl BulkCreateRequest {
    pub fn new() -> Self {
        BulkCreateRequest::default()
    }

    pub fn index(self, index: impl Into<String>) -> Self {
        BulkCreateRequest(self.0.index(index))
    }

    pub fn doc_type(self, doc_type: impl Into<String>) -> Self {
        BulkCreateRequest(self.0.doc_type(doc_type))
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        BulkCreateRequest(self.0.id(id))
    }

    pub fn parent(self, parent: impl Into<String>) -> Self {
        BulkCreateRequest(self.0.parent(parent))
    }

    pub fn routing(self, routing: impl Into<String>) -> Self {
        BulkCreateRequest(self.0.routing(routing))
    }

    pub fn version(self, version: i64) -> Self {
        BulkCreateRequest(self.0.version(version))
    }

    pub fn version_type(self, version_type: impl Into<String>) -> Self {
        BulkCreateRequest(self.0.version_type(version_type))
    }

    pub fn retry_on_conflict(self, retry_on_conflict: u32) -> Self {
        BulkCreateRequest(self.0.retry_on_conflict(retry_on_conflict))
    }

    pub fn pipeline(self, pipeline: impl Into<String>) -> Self {
        BulkCreateRequest(self.0.pipeline(pipeline))
    }

    pub fn if_seq_no(self, seq_no: i64) -> Self {
        BulkCreateRequest(self.0.if_seq_no(seq_no))
    }

    pub fn if_primary_term(self, primary_term: i64) -> Self {
        BulkCreateRequest(self.0.if_primary_term(primary_term))
    }

    pub fn doc(self, doc: Value) -> Self {
        BulkCreateRequest(self.0.doc(doc))
    }

    pub fn doc_raw(self, doc: impl Into<String>) -> Self {
        BulkCreateRequest(self.0.doc_raw(doc))
    }

    pub fn doc_bytes(self, doc: impl Into<Vec<u8>>) -> Self {
        BulkCreateRequest(self.0.doc_bytes(doc))
    }

    pub fn use_fast_encoder(self, enable: bool) -> Self {
        BulkCreateRequest(self.0.use_fast_encoder(enable))
    }
}

impl BulkableRequest for BulkCreateRequest {
    fn source(&mut self) -> Result<Vec<String>, Error> {
        self.0.source()
    }
}

impl fmt::Display for BulkCreateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Removes a document in a bulk request. It has no document line.
#[derive(Debug, Clone, Default)]
pub struct BulkDeleteRequest {
    index: Option<String>,
    doc_type: Option<String>,
    id: Option<String>,
    parent: Option<String>,
    routing: Option<String>,
    version: Option<i64>,
    version_type: Option<String>,
    if_seq_no: Option<i64>,
    if_primary_term: Option<i64>,
    fast_encoder: bool,
    source: Option<Vec<String>>,
}

impl BulkDeleteRequest {
    pub fn new() -> Self {
        BulkDeleteRequest::default()
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self.source = None;
        self
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self.source = None;
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self.source = None;
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self.source = None;
        self
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self.source = None;
        self
    }

    pub fn version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self.source = None;
        self
    }

    pub fn version_type(mut self, version_type: impl Into<String>) -> Self {
        self.version_type = Some(version_type.into());
        self.source = None;
        self
    }

    // NOTE: same as for index requests, a cached source is not cleared.
    pub fn if_seq_no(mut self, seq_no: i64) -> Self {
        self.if_seq_no = Some(seq_no);
        self
    }

    pub fn if_primary_term(mut self, primary_term: i64) -> Self {
        self.if_primary_term = Some(primary_term);
        self
    }

    pub fn use_fast_encoder(mut self, enable: bool) -> Self {
        self.fast_encoder = enable;
        self.source = None;
        self
    }

    fn encode(&self) -> Result<Vec<String>, Error> {
        let command = BulkCommandOp {
            index: self.index.as_deref(),
            doc_type: self.doc_type.as_deref(),
            id: self.id.as_deref(),
            parent: self.parent.as_deref(),
            routing: self.routing.as_deref(),
            version: self.version,
            version_type: self.version_type.as_deref(),
            if_seq_no: self.if_seq_no,
            if_primary_term: self.if_primary_term,
            ..BulkCommandOp::default()
        };
        let meta = if self.fast_encoder {
            command.write_line("delete")
        } else {
            command.to_line("delete")?
        };
        Ok(vec![meta])
    }
}

impl BulkableRequest for BulkDeleteRequest {
    fn source(&mut self) -> Result<Vec<String>, Error> {
        if let Some(source) = &self.source {
            return Ok(source.clone());
        }
        let lines = self.encode()?;
        self.source = Some(lines.clone());
        Ok(lines)
    }
}

impl fmt::Display for BulkDeleteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_lines(f, self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_encode_index_action() {
        let mut request = BulkIndexRequest::new()
            .index("index1")
            .doc_type("doc")
            .id("1")
            .doc(json!({"user": "olivere"}));
        assert_eq!(
            request.source().unwrap(),
            vec![
                r#"{"index":{"_index":"index1","_type":"doc","_id":"1"}}"#.to_string(),
                r#"{"user":"olivere"}"#.to_string(),
            ]
        );
    }

    #[test]
    fn should_keep_field_order_and_skip_unset_fields() {
        let mut request = BulkIndexRequest::new()
            .if_primary_term(2)
            .pipeline("my_pipeline")
            .retry_on_conflict(3)
            .version_type("external")
            .version(7)
            .routing("r1")
            .parent("p1")
            .id("1")
            .index("index1")
            .if_seq_no(42);
        assert_eq!(
            request.source().unwrap()[0],
            concat!(
                r#"{"index":{"_index":"index1","_id":"1","parent":"p1","routing":"r1","#,
                r#""version":7,"version_type":"external","retry_on_conflict":3,"#,
                r#""pipeline":"my_pipeline","if_seq_no":42,"if_primary_term":2}}"#
            )
        );
    }

    #[test]
    fn should_send_empty_document_when_unset() {
        let mut request = BulkIndexRequest::new().index("index1").id("1");
        assert_eq!(request.source().unwrap()[1], "{}");
    }

    #[test]
    fn should_pass_raw_documents_through() {
        let mut raw = BulkIndexRequest::new().index("i").doc_raw(r#"{"b":1, "a":2}"#);
        assert_eq!(raw.source().unwrap()[1], r#"{"b":1, "a":2}"#);
        let mut bytes = BulkIndexRequest::new()
            .index("i")
            .doc_bytes(r#"{"z":"é"}"#.as_bytes().to_vec());
        assert_eq!(bytes.source().unwrap()[1], r#"{"z":"é"}"#);
    }

    #[test]
    fn should_reject_invalid_utf8_bytes() {
        let mut request = BulkIndexRequest::new().index("i").doc_bytes(vec![0xff, 0xfe]);
        assert!(matches!(
            request.source(),
            Err(Error::InvalidSource { .. })
        ));
    }

    #[test]
    fn should_encode_create_action() {
        let mut request = BulkCreateRequest::new()
            .index("index1")
            .id("1")
            .doc(json!({"user": "olivere"}));
        assert_eq!(
            request.source().unwrap()[0],
            r#"{"create":{"_index":"index1","_id":"1"}}"#
        );
        let mut index_as_create = BulkIndexRequest::new().op_type("create").index("index1");
        assert_eq!(
            index_as_create.source().unwrap()[0],
            r#"{"create":{"_index":"index1"}}"#
        );
    }

    #[test]
    fn should_encode_delete_action_on_one_line() {
        let mut request = BulkDeleteRequest::new()
            .index("index1")
            .doc_type("doc")
            .id("1")
            .version(2)
            .if_seq_no(5);
        assert_eq!(
            request.source().unwrap(),
            vec![
                r#"{"delete":{"_index":"index1","_type":"doc","_id":"1","version":2,"if_seq_no":5}}"#
                    .to_string()
            ]
        );
        assert_eq!(
            request.to_string(),
            r#"{"delete":{"_index":"index1","_type":"doc","_id":"1","version":2,"if_seq_no":5}}"#
        );
    }

    #[test]
    fn should_produce_identical_bytes_with_fast_encoder() {
        let build = |fast: bool| {
            BulkIndexRequest::new()
                .index("in\"dex")
                .doc_type("doc")
                .id("1\n2")
                .routing("é")
                .version(-1)
                .retry_on_conflict(0)
                .if_primary_term(9)
                .doc(json!({"a": [1, 2]}))
                .use_fast_encoder(fast)
        };
        let mut serde = build(false);
        let mut fast = build(true);
        assert_eq!(serde.source().unwrap(), fast.source().unwrap());

        let mut empty_serde = BulkDeleteRequest::new();
        let mut empty_fast = BulkDeleteRequest::new().use_fast_encoder(true);
        assert_eq!(empty_serde.source().unwrap(), vec![r#"{"delete":{}}"#.to_string()]);
        assert_eq!(empty_serde.source().unwrap(), empty_fast.source().unwrap());

        let mut only_number = BulkDeleteRequest::new().version(3).use_fast_encoder(true);
        assert_eq!(only_number.source().unwrap()[0], r#"{"delete":{"version":3}}"#);
    }

    #[test]
    fn should_cache_source_until_a_setter_clears_it() {
        let mut request = BulkIndexRequest::new().index("index1").id("1");
        let first = request.source().unwrap();

        let mut request = request.if_seq_no(10).if_primary_term(1);
        assert_eq!(request.source().unwrap(), first);

        let mut request = request.routing("r");
        assert_eq!(
            request.source().unwrap()[0],
            r#"{"index":{"_index":"index1","_id":"1","routing":"r","if_seq_no":10,"if_primary_term":1}}"#
        );
    }

    #[test]
    fn should_display_lines_joined_by_newline() {
        let request = BulkIndexRequest::new().index("i").id("1").doc(json!({"a": 1}));
        assert_eq!(
            request.to_string(),
            "{\"index\":{\"_index\":\"i\",\"_id\":\"1\"}}\n{\"a\":1}"
        );
    }
}
