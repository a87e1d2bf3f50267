//! Cancellation-aware context observed by the logger
//!
//! The logger never owns cancellation; it only polls the caller's context.

use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Caller-owned context the logger polls before every remote submission.
///
/// Done means either the token was cancelled or the optional deadline has
/// passed. Cloning shares the same token.
#[derive(Debug, Clone)]
pub struct SystemContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl SystemContext {
    /// A context that is never done until cancelled
    pub fn new() -> Self {
        Self::from_token(CancellationToken::new())
    }

    /// Observe an existing token, e.g. an application-wide shutdown token
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Set an absolute deadline after which the context counts as done
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context cancelled together with this one, but which can also
    /// be cancelled on its own
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Non-blocking poll: cancelled or past the deadline
    #[inline]
    pub fn is_done(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

impl Default for SystemContext {
    fn default() -> Self {
        Self::new()
    }
}

impl From<CancellationToken> for SystemContext {
    fn from(token: CancellationToken) -> Self {
        Self::from_token(token)
    }
}
