pub mod common;
pub mod context;
pub mod error;
pub mod request;
