use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::api::{strings, CommonParams, IndicesOptions};
use crate::client::Client;
use crate::domain::model::context::Context;
use crate::domain::model::error::Error;
use crate::domain::model::request::{Method, Params, Request};
use crate::utils::path;

/// The state transitions of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Open,
    Close,
    Freeze,
    Unfreeze,
}

impl StateChange {
    fn endpoint(self) -> &'static str {
        match self {
            StateChange::Open => "_open",
            StateChange::Close => "_close",
            StateChange::Freeze => "_freeze",
            StateChange::Unfreeze => "_unfreeze",
        }
    }
}

/// Opens, closes, freezes or unfreezes indices, see [`Client::indices_open`],
/// [`Client::indices_close`], [`Client::indices_freeze`] and
/// [`Client::indices_unfreeze`].
#[derive(Debug, Clone)]
pub struct IndicesStateService {
    client: Client,
    common: CommonParams,
    options: IndicesOptions,
    change: StateChange,
    index: Vec<String>,
    timeout: Option<String>,
    master_timeout: Option<String>,
    wait_for_active_shards: Option<String>,
}

impl IndicesStateService {
    pub(crate) fn new(client: Client, change: StateChange) -> Self {
        IndicesStateService {
            client,
            common: CommonParams::default(),
            options: IndicesOptions::default(),
            change,
            index: Vec::new(),
            timeout: None,
            master_timeout: None,
            wait_for_active_shards: None,
        }
    }

    common_setters!();
    indices_options_setters!();

    pub fn index<I, S>(mut self, index: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index.extend(strings(index));
        self
    }

    pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    pub fn master_timeout(mut self, master_timeout: impl Into<String>) -> Self {
        self.master_timeout = Some(master_timeout.into());
        self
    }

    pub fn wait_for_active_shards(mut self, wait_for_active_shards: impl Into<String>) -> Self {
        self.wait_for_active_shards = Some(wait_for_active_shards.into());
        self
    }

    pub fn build_url(&self) -> (String, Params) {
        let url = format!(
            "/{}/{}",
            path::encode_list(&self.index),
            self.change.endpoint()
        );
        let mut params = self.common.params();
        self.options.set_params(&mut params);
        params.set_opt("timeout", &self.timeout);
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_opt("wait_for_active_shards", &self.wait_for_active_shards);
        (url, params)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.index.is_empty() {
            missing.push("Index");
        }
        Error::check_missing(missing)
    }

    pub async fn send(&self, ctx: &Context) -> Result<IndicesStateResponse, Error> {
        self.validate()?;
        let (url, params) = self.build_url();
        let request = Request::new(Method::POST, url)
            .params(params)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicesStateResponse {
    pub acknowledged: bool,
    pub shards_acknowledged: bool,
    /// Per index outcome, only reported when closing.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub indices: HashMap<String, Value>,
}
