//! Structured-query construction for the `:runQuery` endpoint.
//!
//! Only the slice the admin workflows need: equality filters combined with
//! `AND`, projecting `__name__` so no document fields travel back.

use serde::Deserialize;
use serde_json::{json, Value as Json};

use crate::value::Value;

/// Build a single equality `fieldFilter` clause.
fn field_filter(field_path: &str, value: &Value) -> Json {
    json!({
        "fieldFilter": {
            "field": { "fieldPath": field_path },
            "op": "EQUAL",
            "value": value.to_wire()
        }
    })
}

/// Build the `:runQuery` request body counting documents in `collection`
/// that satisfy every `(field_path, value)` equality filter.
pub(crate) fn count_query_body(collection: &str, filters: &[(&str, Value)]) -> Json {
    let mut query = json!({
        "from": [{ "collectionId": collection }],
        "select": { "fields": [{ "fieldPath": "__name__" }] }
    });

    match filters {
        [] => {}
        [(path, value)] => {
            query["where"] = field_filter(path, value);
        }
        many => {
            let clauses: Vec<Json> = many
                .iter()
                .map(|(path, value)| field_filter(path, value))
                .collect();
            query["where"] = json!({
                "compositeFilter": { "op": "AND", "filters": clauses }
            });
        }
    }

    json!({ "structuredQuery": query })
}

/// One element of a `:runQuery` response stream.
///
/// Rows that carry only bookkeeping (`readTime` without a `document`) are
/// not matches and must not be counted.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryRow {
    #[serde(default)]
    pub document: Option<Json>,
}
