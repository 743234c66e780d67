//! `rubber` is a builder-style client for the Elasticsearch REST API.
//!
//! Each operation is a small service object: it is created from a
//! [`Client`], configured with chained setters, and finished with `send`,
//! which takes a [`Context`] bounding how long the call may take.
//!
//! ```rust,no_run
//! use rubber::adapters::secondary::http::remote::connection_from_url;
//! use rubber::domain::ports::secondary::remote::Remote;
//! use rubber::Context;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rubber::Error> {
//!     let client = connection_from_url("http://localhost:9200")?.conn().await?;
//!     let rows = client
//!         .cat_indices()
//!         .columns(["idx", "dc", "rto"])
//!         .send(&Context::background())
//!         .await?;
//!     for row in rows {
//!         println!("{:?} {:?}", row.index, row.docs_count);
//!     }
//!     Ok(())
//! }
//! ```
pub mod adapters;
pub mod api;
pub mod client;
pub mod domain;
pub mod utils;

pub use client::Client;
pub use domain::model::context::Context;
pub use domain::model::error::Error;
