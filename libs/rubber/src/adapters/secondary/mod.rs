pub mod canned;
pub mod http;
