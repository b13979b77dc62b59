//! Conversion between stored documents and typed records.
//!
//! Each storefront collection gets a concrete record type instead of a
//! free-form field map, so shape drift surfaces as a typed decode error
//! (or a compile error) rather than a broken screen.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use orderdesk_firestore::{Document, Value};
use thiserror::Error;

/// A document failed to decode into its record type.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{collection}/{id}: missing required field `{field}`")]
    MissingField {
        collection: &'static str,
        id: String,
        field: &'static str,
    },

    #[error("{collection}/{id}: field `{field}` has an unexpected type")]
    WrongType {
        collection: &'static str,
        id: String,
        field: &'static str,
    },
}

/// A typed record stored in a named collection.
pub trait Record: Sized {
    /// Collection the records live in.
    const COLLECTION: &'static str;

    /// Decode a stored document into the record type.
    fn from_document(doc: &Document) -> Result<Self, DecodeError>;

    /// Field map for storage. Never includes the id; that belongs to the
    /// store.
    fn to_fields(&self) -> BTreeMap<String, Value>;
}

/// Current time as the RFC 3339 string the app stores in
/// `createdAt`/`updatedAt` fields.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn require_str(
    doc: &Document,
    collection: &'static str,
    field: &'static str,
) -> Result<String, DecodeError> {
    match doc.get(field) {
        None | Some(Value::Null) => Err(DecodeError::MissingField {
            collection,
            id: doc.id.clone(),
            field,
        }),
        Some(value) => value
            .as_str()
            .map(str::to_owned)
            .ok_or(DecodeError::WrongType {
                collection,
                id: doc.id.clone(),
                field,
            }),
    }
}

pub(crate) fn require_i64(
    doc: &Document,
    collection: &'static str,
    field: &'static str,
) -> Result<i64, DecodeError> {
    match doc.get(field) {
        None | Some(Value::Null) => Err(DecodeError::MissingField {
            collection,
            id: doc.id.clone(),
            field,
        }),
        Some(value) => value.as_i64().ok_or(DecodeError::WrongType {
            collection,
            id: doc.id.clone(),
            field,
        }),
    }
}

/// Optional string field; absent, null, or mistyped reads as `None`.
pub(crate) fn optional_str(doc: &Document, field: &str) -> Option<String> {
    doc.get(field).and_then(Value::as_str).map(str::to_owned)
}

/// Insert a string field only when present, leaving it off the wire (and
/// out of any update mask) otherwise.
pub(crate) fn put_opt_str(
    fields: &mut BTreeMap<String, Value>,
    name: &str,
    value: Option<&String>,
) {
    if let Some(value) = value {
        fields.insert(name.to_string(), Value::from(value.clone()));
    }
}
