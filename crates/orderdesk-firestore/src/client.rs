//! HTTP client for the Firestore documents API.
//!
//! Request-per-call model: every operation derives a fresh bearer token,
//! issues exactly one request (`fetch_all` being the documented exception,
//! which pages internally), and suspends until the store answers. No
//! batching, no retries, no shared mutable state between calls.

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::Response;
use serde_json::{json, Value as Json};
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::document::Document;
use crate::error::{FirestoreError, Result};
use crate::query::{count_query_body, QueryRow};
use crate::token::TokenSource;
use crate::value::{encode_fields, Value};

/// Page size used when `fetch_all` walks a whole collection.
const LIST_PAGE_SIZE: u32 = 300;

/// One page of a collection enumeration.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub documents: Vec<Document>,
    /// Cursor for the next page; `None` when the enumeration is exhausted.
    pub next_page_token: Option<String>,
}

/// Typed accessor over the Firestore REST documents API.
///
/// Cheap to clone; concurrent calls are safe since the client holds no
/// mutable state beyond the connection pool.
#[derive(Clone)]
pub struct FirestoreClient {
    http: reqwest::Client,
    config: StoreConfig,
    tokens: Arc<dyn TokenSource>,
}

impl FirestoreClient {
    /// Create a client for `config`, deriving credentials from `tokens`.
    pub fn new(config: StoreConfig, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config, tokens })
    }

    /// Fetch every document in `collection`, following page cursors until
    /// the store stops returning one.
    pub async fn fetch_all(&self, collection: &str) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .fetch_page(collection, LIST_PAGE_SIZE, cursor.as_deref())
                .await?;
            documents.extend(page.documents);
            match page.next_page_token {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(documents)
    }

    /// Fetch one page of `collection`, at most `page_size` documents.
    ///
    /// Supplying the returned `next_page_token` on the next call continues
    /// the same enumeration with no overlap and no gaps, provided the
    /// collection is not concurrently mutated.
    pub async fn fetch_page(
        &self,
        collection: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page> {
        let token = self.bearer().await?;
        debug!(collection, page_size, "listing documents");

        let mut request = self
            .http
            .get(self.collection_url(collection))
            .bearer_auth(&token)
            .query(&[("pageSize", page_size.to_string())]);
        if let Some(cursor) = page_token {
            request = request.query(&[("pageToken", cursor)]);
        }

        let body = handle_response(request.send().await?).await?;
        let documents = body
            .get("documents")
            .and_then(Json::as_array)
            .map(|envelopes| {
                envelopes
                    .iter()
                    .filter_map(Document::from_wire)
                    .collect()
            })
            .unwrap_or_default();
        let next_page_token = body
            .get("nextPageToken")
            .and_then(Json::as_str)
            .map(str::to_owned);

        Ok(Page { documents, next_page_token })
    }

    /// Fetch a single document by id.
    pub async fn fetch_by_id(&self, collection: &str, id: &str) -> Result<Document> {
        let token = self.bearer().await?;
        debug!(collection, id, "fetching document");

        let response = self
            .http
            .get(self.document_url(collection, id))
            .bearer_auth(&token)
            .send()
            .await?;
        let body = handle_response(response).await?;

        // A present document always carries a non-empty field set; anything
        // else is the store's way of reporting the id absent.
        let has_fields = body
            .get("fields")
            .and_then(Json::as_object)
            .is_some_and(|fields| !fields.is_empty());
        if !has_fields {
            return Err(FirestoreError::NotFound(format!("{collection}/{id}")));
        }

        Document::from_wire(&body)
            .ok_or_else(|| FirestoreError::Decode("document envelope without a name".to_string()))
    }

    /// Create a document; the store assigns the id, which is returned.
    pub async fn create(
        &self,
        collection: &str,
        fields: &BTreeMap<String, Value>,
    ) -> Result<String> {
        let token = self.bearer().await?;
        debug!(collection, "creating document");

        let response = self
            .http
            .post(self.collection_url(collection))
            .bearer_auth(&token)
            .json(&json!({ "fields": encode_fields(fields) }))
            .send()
            .await?;
        let body = handle_response(response).await?;

        body.get("name")
            .and_then(Json::as_str)
            .map(|name| Document::id_from_resource_name(name).to_owned())
            .ok_or_else(|| FirestoreError::Decode("create response without a name".to_string()))
    }

    /// Replace exactly the named fields of a document.
    ///
    /// The field mask is derived from the keys of `fields`, one
    /// `updateMask.fieldPaths` entry per key; fields outside the mask are
    /// left untouched by the store.
    pub async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: &BTreeMap<String, Value>,
    ) -> Result<()> {
        let token = self.bearer().await?;
        debug!(collection, id, "updating document");

        let mask: Vec<(&str, &str)> = fields
            .keys()
            .map(|path| ("updateMask.fieldPaths", path.as_str()))
            .collect();
        let response = self
            .http
            .patch(self.document_url(collection, id))
            .bearer_auth(&token)
            .query(&mask)
            .json(&json!({ "fields": encode_fields(fields) }))
            .send()
            .await?;

        ensure_success(response).await
    }

    /// Delete a document. Deleting an id the store does not know fails
    /// with `NotFound`; no tombstone is kept on either side.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let token = self.bearer().await?;
        debug!(collection, id, "deleting document");

        let response = self
            .http
            .delete(self.document_url(collection, id))
            .bearer_auth(&token)
            .send()
            .await?;

        ensure_success(response).await
    }

    /// Count documents matching every equality filter, AND-combined.
    ///
    /// Fallible variant of [`count_filtered`](Self::count_filtered) for
    /// callers that need to tell "zero" apart from "count unavailable".
    pub async fn try_count_filtered(
        &self,
        collection: &str,
        filters: &[(&str, Value)],
    ) -> Result<u64> {
        let token = self.bearer().await?;
        debug!(collection, filters = filters.len(), "counting documents");

        let response = self
            .http
            .post(format!("{}:runQuery", self.config.documents_url()))
            .bearer_auth(&token)
            .json(&count_query_body(collection, filters))
            .send()
            .await?;
        let body = handle_response(response).await?;

        let rows: Vec<QueryRow> = serde_json::from_value(body)
            .map_err(|e| FirestoreError::Decode(format!("unexpected query response: {e}")))?;
        Ok(rows.iter().filter(|row| row.document.is_some()).count() as u64)
    }

    /// Count documents matching every equality filter, resolving to `0` on
    /// any failure.
    ///
    /// Counts feed non-critical UI badges, where a zero is preferable to a
    /// broken screen; the swallowed error is logged, never propagated.
    pub async fn count_filtered(&self, collection: &str, filters: &[(&str, Value)]) -> u64 {
        match self.try_count_filtered(collection, filters).await {
            Ok(count) => count,
            Err(error) => {
                warn!(collection, %error, "count query failed, reporting 0");
                0
            }
        }
    }

    /// Current bearer token, or `Unauthenticated` when nobody is signed in.
    async fn bearer(&self) -> Result<String> {
        self.tokens
            .bearer_token()
            .await?
            .ok_or(FirestoreError::Unauthenticated)
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/{}",
            self.config.documents_url(),
            urlencoding::encode(collection)
        )
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(collection),
            urlencoding::encode(id)
        )
    }
}

/// Check the status and parse the JSON body of a store response.
async fn handle_response(response: Response) -> Result<Json> {
    if response.status().is_success() {
        response
            .json::<Json>()
            .await
            .map_err(|e| FirestoreError::Decode(format!("invalid JSON body: {e}")))
    } else {
        Err(error_from_response(response).await)
    }
}

/// Check the status of a store response, discarding the body on success.
async fn ensure_success(response: Response) -> Result<()> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(response).await)
    }
}

/// Map a non-2xx response to the error taxonomy, pulling the message out
/// of the store's `{"error": {"message": ...}}` envelope when present.
async fn error_from_response(response: Response) -> FirestoreError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Json>(&text)
        .ok()
        .and_then(|body| body["error"]["message"].as_str().map(str::to_owned))
        .unwrap_or_else(|| {
            if text.is_empty() {
                format!("HTTP {status}")
            } else {
                text
            }
        });

    if status == 404 {
        FirestoreError::NotFound(message)
    } else {
        FirestoreError::Store { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::StaticTokenSource;

    fn test_client() -> FirestoreClient {
        FirestoreClient::new(
            StoreConfig::builder("shop").endpoint("http://localhost:1").build(),
            Arc::new(StaticTokenSource::new("tok")),
        )
        .expect("client")
    }

    #[test]
    fn collection_and_document_urls_nest_under_documents_root() {
        let client = test_client();
        assert_eq!(
            client.collection_url("orders"),
            "http://localhost:1/v1/projects/shop/databases/(default)/documents/orders"
        );
        assert_eq!(
            client.document_url("orders", "abc123"),
            "http://localhost:1/v1/projects/shop/databases/(default)/documents/orders/abc123"
        );
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        let client = test_client();
        assert_eq!(
            client.document_url("orders", "a/b"),
            "http://localhost:1/v1/projects/shop/databases/(default)/documents/orders/a%2Fb"
        );
    }
}
