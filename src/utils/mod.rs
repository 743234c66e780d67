pub mod launch;
pub mod logger;
pub mod ndjson;
