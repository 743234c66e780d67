use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use std::collections::BTreeMap;
use std::fmt;

pub use reqwest::Method;

use super::error::{DeserializationSnafu, Error, SerializationSnafu};

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_NDJSON: &str = "application/x-ndjson";

/// Query string parameters, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Params::default()
    }

    pub fn set(&mut self, key: &str, value: impl fmt::Display) {
        self.0.insert(key.to_string(), value.to_string());
    }

    /// Sets the parameter only when a value is present. `Some(false)` is
    /// still sent.
    pub fn set_opt<T: fmt::Display>(&mut self, key: &str, value: &Option<T>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    /// Sets a comma separated parameter, unless the list is empty.
    pub fn set_list(&mut self, key: &str, values: &[String]) {
        if !values.is_empty() {
            self.set(key, values.join(","));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The body of a request: either a JSON value serialized on the way out, or
/// a string sent as is.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Raw(String),
}

impl Body {
    pub fn into_bytes(self) -> Result<Vec<u8>, Error> {
        match self {
            Body::Json(value) => serde_json::to_vec(&value).context(SerializationSnafu {
                details: String::from("cannot serialize request body"),
            }),
            Body::Raw(raw) => Ok(raw.into_bytes()),
        }
    }
}

/// Everything the transport needs to issue one HTTP call.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Path relative to the node URL, already percent-encoded.
    pub path: String,
    pub params: Params,
    pub body: Option<Body>,
    pub content_type: Option<&'static str>,
    pub headers: Vec<(String, String)>,
    /// Statuses which must not be turned into an error.
    pub ignore_errors: Vec<u16>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Request {
            method,
            path: path.into(),
            params: Params::default(),
            body: None,
            content_type: None,
            headers: Vec::new(),
            ignore_errors: Vec::new(),
        }
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn body(mut self, body: Option<Body>) -> Self {
        self.body = body;
        self
    }

    pub fn content_type(mut self, content_type: &'static str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    pub fn ignore_errors(mut self, statuses: &[u16]) -> Self {
        self.ignore_errors.extend_from_slice(statuses);
        self
    }
}

/// A raw HTTP response as returned by the transport.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Response {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).context(DeserializationSnafu {
            details: format!(
                "cannot decode response body into {}",
                std::any::type_name::<T>()
            ),
        })
    }
}
