use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::model::common::ShardsInfo;
use crate::domain::model::error::ErrorDetails;

/// Response of a bulk call. Each item maps the action name (`index`,
/// `create`, `delete`, `update`) to its outcome.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BulkResponse {
    pub took: u64,
    pub errors: bool,
    pub items: Vec<HashMap<String, BulkResponseItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BulkResponseItem {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(rename = "_shards", skip_serializing_if = "Option::is_none")]
    pub shards: Option<ShardsInfo>,
    #[serde(rename = "_seq_no", skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<i64>,
    #[serde(rename = "_primary_term", skip_serializing_if = "Option::is_none")]
    pub primary_term: Option<i64>,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_refresh: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

impl BulkResponseItem {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl BulkResponse {
    pub fn indexed(&self) -> Vec<&BulkResponseItem> {
        self.by_action("index")
    }

    pub fn created(&self) -> Vec<&BulkResponseItem> {
        self.by_action("create")
    }

    pub fn deleted(&self) -> Vec<&BulkResponseItem> {
        self.by_action("delete")
    }

    pub fn updated(&self) -> Vec<&BulkResponseItem> {
        self.by_action("update")
    }

    /// Outcomes of every action of the given kind, in request order.
    pub fn by_action(&self, action: &str) -> Vec<&BulkResponseItem> {
        self.items
            .iter()
            .filter_map(|item| item.get(action))
            .collect()
    }

    /// Outcomes of every action on the document `id`, whatever their kind.
    pub fn by_id(&self, id: &str) -> Vec<&BulkResponseItem> {
        self.outcomes().filter(|item| item.id == id).collect()
    }

    /// Outcomes with a non 2xx status.
    pub fn failed(&self) -> Vec<&BulkResponseItem> {
        self.outcomes().filter(|item| !item.is_success()).collect()
    }

    pub fn succeeded(&self) -> Vec<&BulkResponseItem> {
        self.outcomes().filter(|item| item.is_success()).collect()
    }

    fn outcomes(&self) -> impl Iterator<Item = &BulkResponseItem> {
        self.items.iter().flat_map(|item| item.values())
    }
}
