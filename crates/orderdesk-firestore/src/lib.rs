//! Typed Cloud Firestore REST accessor.
//!
//! Translates between the store's tagged wire values and native [`Value`]
//! trees, and exposes CRUD plus paginated/filtered reads over named
//! collections. Screens and tooling pass plain collection names and plain
//! values; the wire encoding never leaks past this crate.
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//! use orderdesk_firestore::{FirestoreClient, StoreConfig, StaticTokenSource, Value};
//!
//! # async fn demo() -> orderdesk_firestore::Result<()> {
//! let client = FirestoreClient::new(
//!     StoreConfig::new("shopapp-d465b"),
//!     Arc::new(StaticTokenSource::new("id-token")),
//! )?;
//!
//! let mut fields = BTreeMap::new();
//! fields.insert("name".to_string(), Value::from("Trà đá"));
//! fields.insert("price".to_string(), Value::Integer(10_000));
//! let id = client.create("products", &fields).await?;
//!
//! let product = client.fetch_by_id("products", &id).await?;
//! assert_eq!(product.get("price").and_then(Value::as_i64), Some(10_000));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod identity;
mod query;
pub mod token;
pub mod value;

pub use client::{FirestoreClient, Page};
pub use config::{StoreConfig, StoreConfigBuilder};
pub use document::Document;
pub use error::{FirestoreError, Result};
pub use identity::{AuthError, IdentityClient, Session};
pub use token::{NoIdentity, StaticTokenSource, TokenSource};
pub use value::Value;
