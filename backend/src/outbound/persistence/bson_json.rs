//! BSON-to-JSON conversion for opaque product documents.
//!
//! The populator and the response envelope work with plain JSON. Relaxed
//! extended JSON would leak driver framing (`{"$oid": …}`) to clients, so
//! identifiers and timestamps flatten to strings instead.

use mongodb::bson::{Bson, Document};
use serde_json::{Map, Value};

/// Convert one BSON value into plain JSON.
#[must_use]
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Double(d) => serde_json::Number::from_f64(d).map_or(Value::Null, Value::Number),
        Bson::String(s) => Value::String(s),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(doc) => document_to_json(doc),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Int32(i) => Value::from(i),
        Bson::Int64(i) => Value::from(i),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map_or(Value::Null, Value::String),
        Bson::Decimal128(d) => Value::String(d.to_string()),
        Bson::Timestamp(ts) => Value::from(ts.time),
        other => Value::String(other.to_string()),
    }
}

/// Convert a whole document into a JSON object.
#[must_use]
pub fn document_to_json(doc: Document) -> Value {
    let mut out = Map::new();
    for (field, value) in doc {
        out.insert(field, bson_to_json(value));
    }
    Value::Object(out)
}

/// Convert a primary-collection row for the API: plain JSON with the
/// store's `_id` exposed as `key`.
#[must_use]
pub fn record_to_json(doc: Document) -> Value {
    let mut json = document_to_json(doc);
    if let Some(obj) = json.as_object_mut() {
        if let Some(id) = obj.remove("_id") {
            obj.insert("key".to_owned(), id);
        }
    }
    json
}

#[cfg(test)]
mod tests {
    use mongodb::bson::oid::ObjectId;
    use mongodb::bson::{Bson, doc};
    use serde_json::json;

    use super::*;

    #[test]
    fn object_ids_flatten_to_hex_strings() {
        let oid = ObjectId::new();
        assert_eq!(bson_to_json(Bson::ObjectId(oid)), json!(oid.to_hex()));
    }

    #[test]
    fn records_expose_the_id_as_key() {
        let oid = ObjectId::new();
        let record = record_to_json(doc! {
            "_id": oid,
            "name": "Sea salt crisps",
            "price": 2.5,
            "tags": ["snack", "crisps"],
        });

        assert_eq!(record.get("_id"), None);
        assert_eq!(record.get("key"), Some(&json!(oid.to_hex())));
        assert_eq!(record.get("tags"), Some(&json!(["snack", "crisps"])));
    }

    #[test]
    fn nested_documents_convert_recursively() {
        let converted = document_to_json(doc! {
            "nutrition": { "kcal": 530_i32, "salt": 1.2 },
        });
        assert_eq!(converted["nutrition"]["kcal"], json!(530));
    }
}
