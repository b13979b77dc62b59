//! Error types for the Firestore accessor.

use thiserror::Error;

/// Errors surfaced by [`FirestoreClient`](crate::client::FirestoreClient)
/// operations.
///
/// All operations propagate these unchanged; the single exception is
/// `count_filtered`, which swallows every class and reports a zero count.
#[derive(Debug, Error)]
pub enum FirestoreError {
    /// No signed-in identity was available to derive a bearer token from.
    #[error("no signed-in identity")]
    Unauthenticated,

    /// The store reported the addressed document absent.
    #[error("document not found: {0}")]
    NotFound(String),

    /// Network/connection failure before a store response arrived.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx store response the accessor does not specially interpret.
    #[error("store returned HTTP {status}: {message}")]
    Store { status: u16, message: String },

    /// A 2xx response whose body could not be interpreted.
    #[error("unreadable store response: {0}")]
    Decode(String),
}

/// Result type for accessor operations.
pub type Result<T> = std::result::Result<T, FirestoreError>;
