//! Documents and resource-name handling.

use std::collections::BTreeMap;

use serde_json::Value as Json;

use crate::value::{decode_fields, Value};

/// A single record in a collection: a store-assigned identifier plus a
/// mapping from field name to [`Value`].
///
/// The identifier is the final path segment of the store's fully-qualified
/// resource name and never changes across updates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub id: String,
    pub fields: BTreeMap<String, Value>,
}

impl Document {
    /// Look up a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Extract the document id from a fully-qualified resource name, e.g.
    /// `projects/p/databases/(default)/documents/orders/abc123` → `abc123`.
    pub fn id_from_resource_name(name: &str) -> &str {
        name.rsplit('/').next().unwrap_or(name)
    }

    /// Decode a wire document envelope (`name` + `fields`).
    ///
    /// Returns `None` when the envelope carries no resource name; a missing
    /// `fields` object decodes as an empty field map.
    pub(crate) fn from_wire(envelope: &Json) -> Option<Document> {
        let name = envelope.get("name")?.as_str()?;
        Some(Document {
            id: Self::id_from_resource_name(name).to_owned(),
            fields: decode_fields(envelope.get("fields")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_is_the_last_path_segment() {
        let name = "projects/p/databases/(default)/documents/orders/abc123";
        assert_eq!(Document::id_from_resource_name(name), "abc123");
    }

    #[test]
    fn bare_name_passes_through() {
        assert_eq!(Document::id_from_resource_name("abc123"), "abc123");
    }

    #[test]
    fn envelope_decodes_name_and_fields() {
        let envelope = json!({
            "name": "projects/p/databases/(default)/documents/products/tea1",
            "fields": {
                "name": { "stringValue": "Trà đá" },
                "price": { "integerValue": "10000" }
            },
            "createTime": "2025-04-01T08:30:00Z",
            "updateTime": "2025-04-01T08:30:00Z"
        });

        let doc = Document::from_wire(&envelope).expect("valid envelope");
        assert_eq!(doc.id, "tea1");
        assert_eq!(doc.get("name").and_then(Value::as_str), Some("Trà đá"));
        assert_eq!(doc.get("price").and_then(Value::as_i64), Some(10000));
    }

    #[test]
    fn envelope_without_name_is_rejected() {
        assert_eq!(Document::from_wire(&json!({ "fields": {} })), None);
    }

    #[test]
    fn envelope_without_fields_decodes_empty() {
        let envelope = json!({ "name": "projects/p/databases/(default)/documents/orders/x" });
        let doc = Document::from_wire(&envelope).expect("valid envelope");
        assert!(doc.fields.is_empty());
    }
}
