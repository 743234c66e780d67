//! Bulk indexing: many index, create and delete actions in one NDJSON call.
mod request;
mod response;
mod service;

pub use request::{BulkCreateRequest, BulkDeleteRequest, BulkIndexRequest, BulkableRequest, Doc};
pub use response::{BulkResponse, BulkResponseItem};
pub use service::BulkService;
