use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::time::Duration;
use tracing::trace;
use url::Url;

use crate::domain::model::error::{Error, InvalidUrlSnafu};
use crate::domain::model::request::{Request, Response, CONTENT_TYPE_JSON};
use crate::domain::ports::secondary::transport::Transport;
use crate::utils::deserialize::{deserialize_duration, serialize_duration};

pub mod remote;

pub const ES_DEFAULT_URL: &str = "http://localhost:9200";
pub const ES_DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How to reach the cluster.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ElasticsearchConfig {
    pub url: Url,
    /// Upper bound on a whole HTTP exchange, in milliseconds in configuration files.
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub timeout: Duration,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Query the cluster health when connecting, failing early if the cluster
    /// is unreachable.
    #[serde(default)]
    pub healthcheck: bool,
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        ElasticsearchConfig {
            url: Url::parse(ES_DEFAULT_URL).expect("default Elasticsearch URL"),
            timeout: ES_DEFAULT_TIMEOUT,
            username: None,
            password: None,
            healthcheck: false,
        }
    }
}

/// A transport over HTTP(S), backed by a `reqwest` client and its connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
    username: Option<String>,
    password: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ElasticsearchConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| Error::Connection {
                details: String::from("cannot build HTTP client"),
                source: Box::new(err),
            })?;
        Ok(HttpTransport {
            client,
            url: config.url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn url_for(&self, request: &Request) -> Result<Url, Error> {
        let base = self.url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{}{}", base, request.path)).context(InvalidUrlSnafu {
            details: format!("cannot build URL for path {}", request.path),
        })?;
        if !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(request.params.iter());
        }
        Ok(url)
    }
}

fn transport_error(err: reqwest::Error, details: String) -> Error {
    if err.is_timeout() {
        Error::DeadlineExceeded
    } else if err.is_connect() {
        Error::Connection {
            details,
            source: Box::new(err),
        }
    } else {
        Error::Transport {
            details,
            source: Box::new(err),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform_request(&self, request: Request) -> Result<Response, Error> {
        let url = self.url_for(&request)?;
        let details = format!("{} {}", request.method, request.path);
        trace!("sending {}", url);

        let mut builder = self.client.request(request.method.clone(), url);
        if let Some(username) = &self.username {
            builder = builder.basic_auth(username, self.password.as_ref());
        }
        for (name, value) in &request.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|err| Error::InvalidHeader {
                    name: name.clone(),
                    details: err.to_string(),
                })?;
            let header_value = HeaderValue::from_str(value).map_err(|err| Error::InvalidHeader {
                name: name.clone(),
                details: err.to_string(),
            })?;
            builder = builder.header(header_name, header_value);
        }
        if let Some(body) = request.body {
            let content_type = request.content_type.unwrap_or(CONTENT_TYPE_JSON);
            builder = builder
                .header(CONTENT_TYPE, content_type)
                .body(body.into_bytes()?);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| transport_error(err, details.clone()))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|err| transport_error(err, details))?;

        Ok(Response {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}
