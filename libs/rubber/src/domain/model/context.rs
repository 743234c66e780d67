use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::Error;

/// Carries the deadline and cancellation signal of a call.
///
/// Every `send` takes a context. If the deadline passes, or the token is
/// canceled, before the HTTP exchange completes, the call is abandoned and
/// returns [`Error::DeadlineExceeded`] or [`Error::Canceled`].
///
/// ```rust
/// use std::time::Duration;
/// use rubber::Context;
///
/// let ctx = Context::with_timeout(Duration::from_secs(5));
/// let token = ctx.token().clone();
/// // Somewhere else: token.cancel();
/// # drop(token);
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            deadline: None,
            token: CancellationToken::new(),
        }
    }
}

impl Context {
    /// A context which never expires and is never canceled on its own.
    pub fn background() -> Self {
        Context::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Context::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Context {
            deadline: Some(deadline),
            token: CancellationToken::new(),
        }
    }

    /// Uses an existing token, so that canceling it (or its parent) cancels
    /// every call made with this context.
    pub fn with_token(token: CancellationToken) -> Self {
        Context {
            deadline: None,
            token,
        }
    }

    /// Shortens the deadline to at most `timeout` from now.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel()
    }

    pub fn is_canceled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drives `future` to completion unless the context is canceled or its
    /// deadline passes first.
    pub async fn run<T, F>(&self, future: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        if self.token.is_cancelled() {
            return Err(Error::Canceled);
        }
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Error::Canceled),
            _ = deadline => Err(Error::DeadlineExceeded),
            res = future => res,
        }
    }
}
