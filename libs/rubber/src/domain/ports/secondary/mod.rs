pub mod remote;
pub mod transport;
