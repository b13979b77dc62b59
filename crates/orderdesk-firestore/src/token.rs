//! Bearer credential sources.
//!
//! The accessor never caches tokens: every operation asks its
//! [`TokenSource`] for the current bearer before issuing the request, so a
//! sign-out or token rotation between calls takes effect immediately.

use async_trait::async_trait;

use crate::error::Result;

/// Supplier of the current caller identity's bearer token.
///
/// Returning `Ok(None)` means no identity is signed in; the client maps
/// that to [`FirestoreError::Unauthenticated`](crate::FirestoreError::Unauthenticated)
/// before any request leaves the process.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn bearer_token(&self) -> Result<Option<String>>;
}

/// Fixed-token source for tests and offline tooling.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn bearer_token(&self) -> Result<Option<String>> {
        Ok(Some(self.token.clone()))
    }
}

/// Source that never yields a token; every accessor call fails
/// `Unauthenticated`. Useful for exercising signed-out paths.
#[derive(Debug, Clone, Default)]
pub struct NoIdentity;

#[async_trait]
impl TokenSource for NoIdentity {
    async fn bearer_token(&self) -> Result<Option<String>> {
        Ok(None)
    }
}
