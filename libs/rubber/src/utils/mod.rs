pub mod deserialize;
pub mod path;
