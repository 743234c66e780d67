use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::model::error::Error;
use crate::domain::model::request::{Request, Response};

/// Performs one HTTP exchange with an Elasticsearch node.
///
/// Implementations only move bytes: status checking, cancellation and
/// decoding are handled by the [`Client`](crate::Client). A non 2xx status
/// is therefore a successful `perform_request`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform_request(&self, request: Request) -> Result<Response, Error>;
}

#[async_trait]
impl<T: ?Sized> Transport for Box<T>
where
    T: Transport,
{
    async fn perform_request(&self, request: Request) -> Result<Response, Error> {
        (**self).perform_request(request).await
    }
}

#[async_trait]
impl<T: ?Sized> Transport for Arc<T>
where
    T: Transport,
{
    async fn perform_request(&self, request: Request) -> Result<Response, Error> {
        (**self).perform_request(request).await
    }
}
