//! Document field values and the Firestore typed-value wire codec.
//!
//! The REST API never transports bare JSON values; every scalar is wrapped
//! in a single-key object naming its type (`{"integerValue": "42"}`).
//! Application code works with [`Value`] and lets this module handle the
//! wrapping in both directions.

use std::collections::BTreeMap;

use serde_json::{json, Value as Json};

/// A single document field value.
///
/// Integers and doubles are distinct variants: `74` and `74.0` carry
/// different wire tags and survive a round trip unchanged. Callers that
/// collapse the two before encoding lose that distinction, which is the
/// one lossy corner of the codec.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent/null field.
    #[default]
    Null,
    Bool(bool),
    /// 64-bit integer; transported as a decimal string on the wire.
    Integer(i64),
    Double(f64),
    String(String),
    Array(Vec<Value>),
    /// Nested field mapping.
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// Encode into the REST API's tagged representation.
    pub fn to_wire(&self) -> Json {
        match self {
            Value::Null => json!({ "nullValue": null }),
            Value::Bool(b) => json!({ "booleanValue": b }),
            Value::Integer(i) => json!({ "integerValue": i.to_string() }),
            Value::Double(d) => json!({ "doubleValue": d }),
            Value::String(s) => json!({ "stringValue": s }),
            Value::Array(items) => {
                let values: Vec<Json> = items.iter().map(Value::to_wire).collect();
                json!({ "arrayValue": { "values": values } })
            }
            Value::Map(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
        }
    }

    /// Decode a tagged wire value, dispatching on the type key.
    ///
    /// `timestampValue` and `referenceValue` decode as plain strings, the
    /// same way the admin screens consume them. Shapes carrying no known
    /// tag fall back to a structural conversion instead of failing.
    pub fn from_wire(wire: &Json) -> Value {
        let Some(tagged) = wire.as_object() else {
            return Value::from_json(wire);
        };

        if tagged.contains_key("nullValue") {
            return Value::Null;
        }
        if let Some(b) = tagged.get("booleanValue").and_then(Json::as_bool) {
            return Value::Bool(b);
        }
        if let Some(raw) = tagged.get("integerValue") {
            // The store serializes int64 as a string; tolerate a bare number too.
            if let Some(i) = raw.as_str().and_then(|s| s.parse::<i64>().ok()).or(raw.as_i64()) {
                return Value::Integer(i);
            }
        }
        if let Some(d) = tagged.get("doubleValue").and_then(Json::as_f64) {
            return Value::Double(d);
        }
        if let Some(s) = tagged
            .get("stringValue")
            .or_else(|| tagged.get("timestampValue"))
            .or_else(|| tagged.get("referenceValue"))
            .and_then(Json::as_str)
        {
            return Value::String(s.to_owned());
        }
        if let Some(array) = tagged.get("arrayValue") {
            let items = array
                .get("values")
                .and_then(Json::as_array)
                .map(|values| values.iter().map(Value::from_wire).collect())
                .unwrap_or_default();
            return Value::Array(items);
        }
        if let Some(map) = tagged.get("mapValue") {
            return Value::Map(decode_fields(map.get("fields")));
        }

        Value::from_json(wire)
    }

    /// Best-effort conversion from untagged JSON. Numbers become integers
    /// when they fit in an `i64`, doubles otherwise.
    pub fn from_json(json: &Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Double(n.as_f64().unwrap_or(0.0)),
            },
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::Array(items.iter().map(Value::from_json).collect()),
            Json::Object(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::from_json(value)))
                    .collect(),
            ),
        }
    }
}

/// Encode a whole field map into the wire `fields` object.
pub(crate) fn encode_fields(fields: &BTreeMap<String, Value>) -> Json {
    let entries: serde_json::Map<String, Json> = fields
        .iter()
        .map(|(name, value)| (name.clone(), value.to_wire()))
        .collect();
    Json::Object(entries)
}

/// Decode a wire `fields` object; tolerates the key being absent entirely.
pub(crate) fn decode_fields(fields: Option<&Json>) -> BTreeMap<String, Value> {
    fields
        .and_then(Json::as_object)
        .map(|entries| {
            entries
                .iter()
                .map(|(name, value)| (name.clone(), Value::from_wire(value)))
                .collect()
        })
        .unwrap_or_default()
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Value::Map(fields)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}
