use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snafu::ResultExt;

use crate::api::{strings, CommonParams};
use crate::client::Client;
use crate::domain::model::common::ShardsInfo;
use crate::domain::model::context::Context;
use crate::domain::model::error::{Error, SerializationSnafu};
use crate::domain::model::request::{Body, Method, Params, Request, CONTENT_TYPE_JSON};
use crate::utils::path;

// Body sent when no explicit body is given.
#[derive(Debug, Clone, Default, Serialize)]
struct RestoreBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    indices: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ignore_unavailable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_global_state: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    partial: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rename_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rename_replacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_aliases: Option<bool>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    index_settings: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ignore_index_settings: Vec<String>,
}

/// Restores a snapshot, see [`Client::snapshot_restore`].
///
/// Restore options are sent as the body, unless an explicit body is given.
#[derive(Debug, Clone)]
pub struct SnapshotRestoreService {
    client: Client,
    common: CommonParams,
    repository: Option<String>,
    snapshot: Option<String>,
    master_timeout: Option<String>,
    wait_for_completion: Option<bool>,
    indices: Vec<String>,
    options: RestoreBody,
    body: Option<Body>,
}

impl SnapshotRestoreService {
    pub(crate) fn new(client: Client) -> Self {
        SnapshotRestoreService {
            client,
            common: CommonParams::default(),
            repository: None,
            snapshot: None,
            master_timeout: None,
            wait_for_completion: None,
            indices: Vec::new(),
            options: RestoreBody::default(),
            body: None,
        }
    }

    common_setters!();

    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn snapshot(mut self, snapshot: impl Into<String>) -> Self {
        self.snapshot = Some(snapshot.into());
        self
    }

    pub fn master_timeout(mut self, master_timeout: impl Into<String>) -> Self {
        self.master_timeout = Some(master_timeout.into());
        self
    }

    pub fn wait_for_completion(mut self, wait_for_completion: bool) -> Self {
        self.wait_for_completion = Some(wait_for_completion);
        self
    }

    /// Indices to restore, all of them by default.
    pub fn indices<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(strings(indices));
        self
    }

    pub fn ignore_unavailable(mut self, ignore_unavailable: bool) -> Self {
        self.options.ignore_unavailable = Some(ignore_unavailable);
        self
    }

    pub fn include_global_state(mut self, include_global_state: bool) -> Self {
        self.options.include_global_state = Some(include_global_state);
        self
    }

    /// Allows restoring indices whose shards were not all snapshotted.
    pub fn partial(mut self, partial: bool) -> Self {
        self.options.partial = Some(partial);
        self
    }

    /// Regular expression matched against restored index names.
    pub fn rename_pattern(mut self, rename_pattern: impl Into<String>) -> Self {
        self.options.rename_pattern = Some(rename_pattern.into());
        self
    }

    /// Replacement for [`rename_pattern`](Self::rename_pattern), with `$1`
    /// style references to its groups.
    pub fn rename_replacement(mut self, rename_replacement: impl Into<String>) -> Self {
        self.options.rename_replacement = Some(rename_replacement.into());
        self
    }

    pub fn include_aliases(mut self, include_aliases: bool) -> Self {
        self.options.include_aliases = Some(include_aliases);
        self
    }

    /// Overrides a setting of the restored indices.
    pub fn index_setting(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.index_settings.insert(name.into(), value.into());
        self
    }

    /// Settings of the snapshotted indices not to restore.
    pub fn ignore_index_settings<I, S>(mut self, settings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.ignore_index_settings.extend(strings(settings));
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

    pub fn build_url(&self) -> (String, Params) {
        let url = format!(
            "/_snapshot/{}/{}/_restore",
            path::encode(self.repository.as_deref().unwrap_or_default()),
            path::encode(self.snapshot.as_deref().unwrap_or_default())
        );
        let mut params = self.common.params();
        params.set_opt("master_timeout", &self.master_timeout);
        params.set_opt("wait_for_completion", &self.wait_for_completion);
        (url, params)
    }

    pub fn build_body(&self) -> Result<Body, Error> {
        if let Some(body) = &self.body {
            return Ok(body.clone());
        }
        let mut options = self.options.clone();
        if !self.indices.is_empty() {
            options.indices = Some(self.indices.join(","));
        }
        let body = serde_json::to_value(&options).context(SerializationSnafu {
            details: String::from("cannot serialize restore options"),
        })?;
        Ok(Body::Json(body))
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.repository.is_none() {
            missing.push("Repository");
        }
        if self.snapshot.is_none() {
            missing.push("Snapshot");
        }
        Error::check_missing(missing)
    }

    pub async fn send(&self, ctx: &Context) -> Result<SnapshotRestoreResponse, Error> {
        self.validate()?;
        let (url, params) = self.build_url();
        let request = Request::new(Method::POST, url)
            .params(params)
            .body(Some(self.build_body()?))
            .content_type(CONTENT_TYPE_JSON)
            .headers(self.common.headers.clone());
        let response = self.client.perform_request(ctx, request).await?;
        response.json()
    }
}

/// `accepted` is set when not waiting for completion, `snapshot` otherwise.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotRestoreResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<RestoreInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RestoreInfo {
    pub snapshot: String,
    pub indices: Vec<String>,
    pub shards: ShardsInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secondary::canned::CannedTransport;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn should_build_body_from_options() {
        let client = Client::new(CannedTransport::new());
        let service = client
            .snapshot_restore()
            .repository("my_backup")
            .snapshot("snapshot_1")
            .indices(["index_1", "index_2"])
            .ignore_unavailable(true)
            .include_global_state(false)
            .rename_pattern("index_(.+)")
            .rename_replacement("restored_index_$1")
            .index_setting("index.number_of_replicas", 0)
            .ignore_index_settings(["index.refresh_interval"]);
        assert_eq!(
            service.build_body().unwrap(),
            Body::Json(json!({
                "indices": "index_1,index_2",
                "ignore_unavailable": true,
                "include_global_state": false,
                "rename_pattern": "index_(.+)",
                "rename_replacement": "restored_index_$1",
                "index_settings": {"index.number_of_replicas": 0},
                "ignore_index_settings": ["index.refresh_interval"]
            }))
        );
    }

    #[test]
    fn should_send_empty_object_without_options() {
        let client = Client::new(CannedTransport::new());
        let service = client.snapshot_restore().repository("r").snapshot("s");
        assert_eq!(service.build_body().unwrap(), Body::Json(json!({})));
    }

    #[tokio::test]
    async fn should_restore_snapshot() {
        let transport = Arc::new(CannedTransport::new().respond(
            200,
            r#"{"snapshot":{"snapshot":"snapshot_1","indices":["restored_index_1"],
                "shards":{"total":1,"failed":0,"successful":1}}}"#,
        ));
        let client = Client::new(transport.clone());
        let response = client
            .snapshot_restore()
            .repository("my_backup")
            .snapshot("snapshot_1")
            .wait_for_completion(true)
            .send(&Context::background())
            .await
            .unwrap();
        let info = response.snapshot.unwrap();
        assert_eq!(info.indices, vec!["restored_index_1"]);
        assert_eq!(info.shards.successful, 1);

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/_snapshot/my_backup/snapshot_1/_restore");
    }
}
