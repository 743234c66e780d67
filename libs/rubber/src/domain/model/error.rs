use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use snafu::Snafu;
use std::collections::HashMap;
use tracing::debug;

use super::request::Response;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Required builder fields were not set. Nothing was sent.
    #[snafu(display("missing required fields: {:?}", fields))]
    MissingFields { fields: Vec<&'static str> },

    #[snafu(display("elastic: No bulk actions to commit"))]
    NoBulkActions,

    /// The node could not be reached at all.
    #[snafu(display("Elasticsearch Connection Error: {} [{}]", details, source))]
    Connection {
        details: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[snafu(display("Elasticsearch Transport Error: {} [{}]", details, source))]
    Transport {
        details: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[snafu(display("context canceled"))]
    Canceled,

    #[snafu(display("context deadline exceeded"))]
    DeadlineExceeded,

    /// Error reported by the server in a non 2xx response.
    #[snafu(display("{}", describe(*status, details.as_deref())))]
    Elastic {
        status: u16,
        details: Option<Box<ErrorDetails>>,
    },

    #[snafu(display(
        "elastic: got HTTP code {} when it should have been either 200 or 404",
        status
    ))]
    UnexpectedStatus { status: u16 },

    #[snafu(display("JSON Deserialization Error: {} [{}]", details, source))]
    Deserialization {
        details: String,
        source: serde_json::Error,
    },

    #[snafu(display("JSON Serialization Error: {} [{}]", details, source))]
    Serialization {
        details: String,
        source: serde_json::Error,
    },

    #[snafu(display("Invalid Document Source: {}", details))]
    InvalidSource { details: String },

    #[snafu(display("Invalid Header '{}': {}", name, details))]
    InvalidHeader { name: String, details: String },

    /// A path segment is `.` or `..`, which URL normalization would resolve
    /// against its parent. Nothing was sent.
    #[snafu(display("Invalid Path '{}': dot segments cannot be sent", path))]
    InvalidPath { path: String },

    #[snafu(display("Invalid URL: {} [{}]", details, source))]
    InvalidUrl {
        details: String,
        source: url::ParseError,
    },
}

/// Details of an error returned by Elasticsearch, found under the `error` key
/// of a failed response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorDetails {
    #[serde(rename = "type")]
    pub error_type: String,
    pub reason: String,
    #[serde(rename = "resource.type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(rename = "resource.id", skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caused_by: Option<Box<ErrorDetails>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub root_cause: Vec<ErrorDetails>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<ErrorDetails>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_shards: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<HashMap<String, serde_json::Value>>,

    // Script errors
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub script_stack: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<ScriptErrorPosition>,
}

/// Position of a script compilation error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScriptErrorPosition {
    pub offset: i64,
    pub start: i64,
    pub end: i64,
}

// Failed responses look like {"error": {...}, "status": 400}, though some
// endpoints answer with a plain string under "error".
#[derive(Deserialize)]
struct ErrorReply {
    #[serde(default)]
    error: Option<ErrorPayload>,
    #[serde(default)]
    status: u16,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorPayload {
    Details(Box<ErrorDetails>),
    Reason(String),
}

fn status_text(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}

fn describe(status: u16, details: Option<&ErrorDetails>) -> String {
    match details {
        Some(details) => format!(
            "elastic: Error {} ({}): {} [type={}]",
            status,
            status_text(status),
            details.reason,
            details.error_type
        ),
        None => format!("elastic: Error {} ({})", status, status_text(status)),
    }
}

impl Error {
    /// Builds the error for a failed response, using the structured payload
    /// when the body carries one, and the bare status code otherwise.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        if body.is_empty() {
            return Error::Elastic {
                status,
                details: None,
            };
        }
        match serde_json::from_slice::<ErrorReply>(body) {
            Ok(reply) => {
                let status = if reply.status == 0 {
                    status
                } else {
                    reply.status
                };
                let details = reply.error.map(|payload| match payload {
                    ErrorPayload::Details(details) => details,
                    ErrorPayload::Reason(reason) => Box::new(ErrorDetails {
                        reason,
                        ..ErrorDetails::default()
                    }),
                });
                Error::Elastic { status, details }
            }
            Err(err) => {
                debug!("cannot decode error payload for status {}: {}", status, err);
                Error::Elastic {
                    status,
                    details: None,
                }
            }
        }
    }

    /// Returns `Ok(())` when no field is missing, the aggregate error otherwise.
    pub fn check_missing(fields: Vec<&'static str>) -> Result<(), Self> {
        if fields.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingFields { fields })
        }
    }

    /// The HTTP status reported by the server, if this error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Elastic { status, .. } | Error::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }

    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            Error::Elastic { details, .. } => details.as_deref(),
            _ => None,
        }
    }

    pub fn is_status_code(&self, code: u16) -> bool {
        self.status() == Some(code)
    }

    /// 404
    pub fn is_not_found(&self) -> bool {
        self.is_status_code(404)
    }

    /// 409
    pub fn is_conflict(&self) -> bool {
        self.is_status_code(409)
    }

    /// 401
    pub fn is_unauthorized(&self) -> bool {
        self.is_status_code(401)
    }

    /// 403
    pub fn is_forbidden(&self) -> bool {
        self.is_status_code(403)
    }

    /// 408, the server gave up waiting on the request.
    pub fn is_timeout(&self) -> bool {
        self.is_status_code(408)
    }

    /// True when the call was abandoned because its context was canceled or
    /// its deadline passed, rather than because of a real failure.
    pub fn is_context_err(&self) -> bool {
        matches!(self, Error::Canceled | Error::DeadlineExceeded)
    }

    pub fn is_conn_err(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }
}

/// Accepts 2xx responses and those whose status the caller asked to ignore.
pub fn check_response(response: &Response, ignore_errors: &[u16]) -> Result<(), Error> {
    if response.is_success() || ignore_errors.contains(&response.status) {
        return Ok(());
    }
    Err(Error::from_response(response.status, &response.body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_structured_error() {
        let body = br#"{
            "error": {
                "root_cause": [{"type": "index_not_found_exception", "reason": "no such index [foo]", "index": "foo"}],
                "type": "index_not_found_exception",
                "reason": "no such index [foo]",
                "resource.type": "index_or_alias",
                "resource.id": "foo",
                "index": "foo"
            },
            "status": 404
        }"#;
        let err = Error::from_response(404, body);
        assert!(err.is_not_found());
        let details = err.details().expect("details");
        assert_eq!(details.error_type, "index_not_found_exception");
        assert_eq!(details.resource_type.as_deref(), Some("index_or_alias"));
        assert_eq!(details.root_cause.len(), 1);
        assert_eq!(
            err.to_string(),
            "elastic: Error 404 (Not Found): no such index [foo] [type=index_not_found_exception]"
        );
    }

    #[test]
    fn should_parse_script_error_with_cause_chain() {
        let body = br#"{
            "error": {
                "type": "script_exception",
                "reason": "compile error",
                "script_stack": ["doc['x'].value +", "                ^---- HERE"],
                "script": "doc['x'].value +",
                "lang": "painless",
                "position": {"offset": 16, "start": 0, "end": 16},
                "caused_by": {
                    "type": "illegal_argument_exception",
                    "reason": "unexpected end of script."
                }
            },
            "status": 400
        }"#;
        let err = Error::from_response(400, body);
        let details = err.details().expect("details");
        assert_eq!(details.script_stack.len(), 2);
        assert_eq!(
            details.position,
            Some(ScriptErrorPosition {
                offset: 16,
                start: 0,
                end: 16
            })
        );
        assert_eq!(
            details.caused_by.as_ref().map(|c| c.error_type.as_str()),
            Some("illegal_argument_exception")
        );
    }

    #[test]
    fn should_accept_string_error_payload() {
        let err = Error::from_response(404, br#"{"error":"alias [x] missing","status":404}"#);
        assert_eq!(err.details().map(|d| d.reason.as_str()), Some("alias [x] missing"));
    }

    #[test]
    fn should_fall_back_to_bare_status() {
        let err = Error::from_response(502, b"<html>bad gateway</html>");
        assert!(err.details().is_none());
        assert_eq!(err.to_string(), "elastic: Error 502 (Bad Gateway)");

        let err = Error::from_response(409, b"");
        assert!(err.is_conflict());
    }

    #[test]
    fn should_classify_status_codes() {
        assert!(Error::from_response(401, b"").is_unauthorized());
        assert!(Error::from_response(403, b"").is_forbidden());
        assert!(Error::from_response(408, b"").is_timeout());
        assert!(!Error::from_response(500, b"").is_not_found());
        assert!(Error::Canceled.is_context_err());
        assert!(Error::DeadlineExceeded.is_context_err());
        assert!(!Error::NoBulkActions.is_context_err());
    }

    #[test]
    fn should_list_every_missing_field() {
        let err = Error::check_missing(vec!["index", "id"]).unwrap_err();
        assert_eq!(err.to_string(), r#"missing required fields: ["index", "id"]"#);
        assert!(Error::check_missing(vec![]).is_ok());
    }

    #[test]
    fn should_ignore_listed_statuses() {
        let response = Response {
            status: 404,
            ..Response::default()
        };
        assert!(check_response(&response, &[404]).is_ok());
        assert!(check_response(&response, &[]).unwrap_err().is_not_found());
    }
}
