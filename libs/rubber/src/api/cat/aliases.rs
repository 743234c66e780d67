use serde::{Deserialize, Serialize};

use crate::api::{strings, CommonParams};
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// Lists aliases and the indices they point to, see [`Client::cat_aliases`].
#[derive(Debug, Clone)]
pub struct CatAliasesService {
    client: Client,
    common: CommonParams,
    aliases: Vec<String>,
    local: Option<bool>,
    master_timeout: Option<String>,
    columns: Vec<String>,
    sort: Vec<String>,
    expand_wildcards: Option<String>,
}

impl CatAliasesService {
    pub(crate) fn new(client: Client) -> Self {
        CatAliasesService {
            client,
            common: CommonParams::default(),
            aliases: Vec::new(),
            local: None,
            master_timeout: None,
            columns: Vec::new(),
            sort: Vec::new(),
            expand_wildcards: None,
        }
    }

    common_setters!();

    pub fn alias<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(strings(aliases));
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = Some(local);
        self
    }

    pub fn master_timeout(mut self, master_timeout: impl Into<String>) -> Self {
        self.master_timeout = Some(master_timeout.into());
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(strings(columns));
        self
    }

    pub fn sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort.extend(strings(sort));
        self
    }

    pub fn expand_wildcards(mut self, expand_wildcards: impl Into<String>) -> Self {
        self.expand_wildcards = Some(expand_wildcards.into());
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = if self.aliases.is_empty() {
            String::from("/_cat/aliases")
        } else {
            format!("/_cat/aliases/{}", path::encode_list(&self.aliases))
        };
        let mut params = self.common.params();
        params.set("format", "json");
        params.set_opt("local", &self.local);
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_list("h", &self.columns);
        params.set_list("s", &self.sort);
        params.set_opt("expand_wildcards", &self.expand_wildcards);
        (url, params)
    }

    pub async fn send(&self, ctx: &Context) -> Result<Vec<CatAliasesResponseRow>, Error> {
        let (url, params) = self.build_url();
        let request = Request::new(Method::GET, url)
            .params(params)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatAliasesResponseRow {
    pub alias: String,
    pub index: String,
    /// `*` when the alias has a filter, `-` otherwise.
    pub filter: String,
    #[serde(rename = "routing.index")]
    pub routing_index: String,
    #[serde(rename = "routing.search")]
    pub routing_search: String,
    /// `true`, `false` or `-`.
    pub is_write_index: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_list_aliases() {
        let transport = Arc::new(CannedTransport::new().respond(
            200,
            r#"[{"alias":"tweets","index":"tweets-2021","filter":"-","routing.index":"-",
                 "routing.search":"-","is_write_index":"true"}]"#,
        ));
        let client = Client::new(transport.clone());
        let rows = client
            .cat_aliases()
            .alias(["tweets"])
            .sort(["alias"])
            .send(&Context::background())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index, "tweets-2021");
        assert_eq!(rows[0].is_write_index, "true");

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/_cat/aliases/tweets");
        assert_eq!(request.params.get("format"), Some("json"));
        assert_eq!(request.params.get("s"), Some("alias"));
    }
}
