use async_trait::async_trait;

use crate::domain::model::error::Error;

/// Something that knows how to reach a remote cluster, and can turn itself
/// into a connection.
#[async_trait]
pub trait Remote {
    type Conn;

    async fn conn(self) -> Result<Self::Conn, Error>;
}
