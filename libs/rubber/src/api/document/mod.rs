//! Single document operations.
use serde::{Deserialize, Serialize};

use crate::domain::model::common::ShardsInfo;

mod delete;
mod exists;
mod index;

pub use delete::DeleteService;
pub use exists::ExistsService;
pub use index::IndexService;

pub(crate) const DEFAULT_TYPE: &str = "_doc";

/// Outcome of a document write, shared by index, create and delete.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WriteResponse {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type")]
    pub doc_type: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version")]
    pub version: i64,
    /// `created`, `updated`, `deleted`, `not_found` or `noop`.
    pub result: String,
    #[serde(rename = "_shards", skip_serializing_if = "Option::is_none")]
    pub shards: Option<ShardsInfo>,
    #[serde(rename = "_seq_no")]
    pub seq_no: i64,
    #[serde(rename = "_primary_term")]
    pub primary_term: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_refresh: Option<bool>,
}

pub type IndexResponse = WriteResponse;
pub type DeleteResponse = WriteResponse;
