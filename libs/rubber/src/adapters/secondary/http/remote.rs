use async_trait::async_trait;
use snafu::ResultExt;
use tracing::info;
use url::Url;

use super::{ElasticsearchConfig, HttpTransport};
use crate::domain::model::context::Context;
use crate::domain::model::error::{Error, InvalidUrlSnafu};
use crate::domain::ports::secondary::remote::Remote;
use crate::Client;

#[async_trait]
impl Remote for ElasticsearchConfig {
    type Conn = Client;

    /// Builds a client over HTTP, checking the cluster health first when
    /// `healthcheck` is set.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use rubber::adapters::secondary::http::remote::connection_from_url;
    /// use rubber::domain::ports::secondary::remote::Remote;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///   let client = connection_from_url("http://localhost:9200")
    ///       .expect("valid url")
    ///       .conn()
    ///       .await
    ///       .expect("Elasticsearch connection");
    /// }
    /// ```
    async fn conn(self) -> Result<Self::Conn, Error> {
        let transport = HttpTransport::new(&self)?;
        let client = Client::new(transport);
        if self.healthcheck {
            let health = client
                .cluster_health()
                .send(&Context::with_timeout(self.timeout))
                .await?;
            info!(
                "connected to cluster {} at {} (status {})",
                health.cluster_name, self.url, health.status
            );
        }
        Ok(client)
    }
}

/// Default connection settings for the node at `url`.
pub fn connection_from_url(url: &str) -> Result<ElasticsearchConfig, Error> {
    let url = Url::parse(url).context(InvalidUrlSnafu {
        details: String::from("could not parse Elasticsearch URL"),
    })?;
    Ok(ElasticsearchConfig {
        url,
        ..ElasticsearchConfig::default()
    })
}
