//! A transport replaying canned responses, recording what it was asked.
//!
//! It lets code built on [`Client`](crate::Client) be exercised without a
//! cluster.
//!
//! ```rust
//! use std::sync::Arc;
//! use rubber::adapters::secondary::canned::CannedTransport;
//! use rubber::{Client, Context};
//!
//! #[tokio::main]
//! async fn main() {
//!     let transport = Arc::new(CannedTransport::new().respond(200, ""));
//!     let client = Client::new(transport.clone());
//!     let exists = client
//!         .indices_exists()
//!         .index(["twitter"])
//!         .send(&Context::background())
//!         .await
//!         .unwrap();
//!     assert!(exists);
//!     assert_eq!(transport.last_request().unwrap().path, "/twitter");
//! }
//! ```
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::domain::model::error::Error;
use crate::domain::model::request::{Request, Response};
use crate::domain::ports::secondary::transport::Transport;

#[derive(Debug)]
struct Canned {
    delay: Option<Duration>,
    response: Response,
}

#[derive(Debug, Default)]
pub struct CannedTransport {
    responses: Mutex<VecDeque<Canned>>,
    requests: Mutex<Vec<Request>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CannedTransport {
    pub fn new() -> Self {
        CannedTransport::default()
    }

    /// Queues a response with the given status and body.
    pub fn respond(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.push(None, Response::new(status, body));
        self
    }

    /// Queues a response delivered only after `delay`.
    pub fn respond_after(self, delay: Duration, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.push(Some(delay), Response::new(status, body));
        self
    }

    /// Queues a fully built response.
    pub fn respond_with(self, response: Response) -> Self {
        self.push(None, response);
        self
    }

    fn push(&self, delay: Option<Duration>, response: Response) {
        lock(&self.responses).push_back(Canned { delay, response });
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<Request> {
        lock(&self.requests).last().cloned()
    }
}

#[async_trait]
impl Transport for CannedTransport {
    async fn perform_request(&self, request: Request) -> Result<Response, Error> {
        lock(&self.requests).push(request.clone());
        let canned = lock(&self.responses).pop_front();
        match canned {
            Some(Canned { delay, response }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(response)
            }
            None => Err(Error::Transport {
                details: format!("no canned response for {} {}", request.method, request.path),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "canned responses exhausted",
                )),
            }),
        }
    }
}
