//! Typed collection access over the document-store accessor.
//!
//! Screens work with records, not field maps: a `Collection<Product>`
//! decodes every page it loads and encodes every record it writes, so the
//! wire encoding stays inside `orderdesk-firestore` and the duck typing
//! stays nowhere.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use orderdesk_firestore::{FirestoreClient, FirestoreError, Value};
use thiserror::Error;
use tracing::warn;

use crate::order::{Order, OrderStatus};
use crate::record::{DecodeError, Record};

/// Errors from typed collection operations.
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error(transparent)]
    Store(#[from] FirestoreError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The requested status change is not part of the workflow.
    #[error("order {id}: cannot move from `{}` to `{}`", .from.as_key(), .to.as_key())]
    InvalidTransition {
        id: String,
        from: OrderStatus,
        to: OrderStatus,
    },
}

/// One page of typed records.
#[derive(Debug, Clone)]
pub struct RecordPage<T> {
    pub records: Vec<T>,
    pub next_page_token: Option<String>,
}

/// Typed view of one collection.
pub struct Collection<'a, T: Record> {
    client: &'a FirestoreClient,
    _record: PhantomData<T>,
}

impl<'a, T: Record> Collection<'a, T> {
    pub fn new(client: &'a FirestoreClient) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }

    /// Load every record. Documents that no longer decode are skipped with
    /// a warning; one malformed legacy row must not blank a whole screen.
    pub async fn all(&self) -> Result<Vec<T>, CollectionError> {
        let documents = self.client.fetch_all(T::COLLECTION).await?;
        Ok(documents
            .iter()
            .filter_map(|doc| match T::from_document(doc) {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!(collection = T::COLLECTION, %error, "skipping undecodable document");
                    None
                }
            })
            .collect())
    }

    /// Load one page of records; same skip-with-warning policy as
    /// [`all`](Self::all).
    pub async fn page(
        &self,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<RecordPage<T>, CollectionError> {
        let page = self
            .client
            .fetch_page(T::COLLECTION, page_size, page_token)
            .await?;
        let records = page
            .documents
            .iter()
            .filter_map(|doc| match T::from_document(doc) {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!(collection = T::COLLECTION, %error, "skipping undecodable document");
                    None
                }
            })
            .collect();
        Ok(RecordPage {
            records,
            next_page_token: page.next_page_token,
        })
    }

    /// Load a single record; decode failures are errors here, not skips.
    pub async fn get(&self, id: &str) -> Result<T, CollectionError> {
        let doc = self.client.fetch_by_id(T::COLLECTION, id).await?;
        Ok(T::from_document(&doc)?)
    }

    /// Store a new record; the store assigns and returns the id.
    pub async fn create(&self, record: &T) -> Result<String, CollectionError> {
        Ok(self.client.create(T::COLLECTION, &record.to_fields()).await?)
    }

    /// Replace exactly the supplied fields of a record.
    pub async fn update_fields(
        &self,
        id: &str,
        fields: BTreeMap<String, Value>,
    ) -> Result<(), CollectionError> {
        Ok(self.client.update(T::COLLECTION, id, &fields).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), CollectionError> {
        Ok(self.client.delete(T::COLLECTION, id).await?)
    }
}

impl Collection<'_, Order> {
    /// Number of orders a customer has placed. Fail-soft like the badge it
    /// feeds: errors count as zero.
    pub async fn count_for_user(&self, user_id: &str) -> u64 {
        self.client
            .count_filtered(Order::COLLECTION, &[("userId", Value::from(user_id))])
            .await
    }

    /// Number of a customer's orders currently in `status`.
    pub async fn count_for_user_with_status(&self, user_id: &str, status: OrderStatus) -> u64 {
        self.client
            .count_filtered(
                Order::COLLECTION,
                &[
                    ("userId", Value::from(user_id)),
                    ("status", Value::from(status.as_key())),
                ],
            )
            .await
    }

    /// Move an order along the fulfillment workflow.
    ///
    /// Rejects jumps the workflow does not allow before anything goes on
    /// the wire; a permitted move patches only the `status` field.
    pub async fn transition(
        &self,
        order: &Order,
        next: OrderStatus,
    ) -> Result<(), CollectionError> {
        if !order.status.can_transition_to(next) {
            return Err(CollectionError::InvalidTransition {
                id: order.id.clone(),
                from: order.status,
                to: next,
            });
        }

        let mut fields = BTreeMap::new();
        fields.insert("status".to_string(), Value::from(next.as_key()));
        self.update_fields(&order.id, fields).await
    }
}
