//! Conversion from generated values to BSON.

use bson::{Bson, DateTime as BsonDateTime, Decimal128, Document};
use datagen_core::{GeneratedDocument, GeneratedValue};
use std::str::FromStr;

/// Convert a generated document to a BSON document, keeping field order.
pub fn document_to_bson(document: &GeneratedDocument) -> Document {
    fields_to_bson(&document.fields)
}

fn fields_to_bson(fields: &[(String, GeneratedValue)]) -> Document {
    let mut doc = Document::new();
    for (key, value) in fields {
        doc.insert(key.clone(), value_to_bson(value));
    }
    doc
}

/// Convert a single generated value to BSON.
pub fn value_to_bson(value: &GeneratedValue) -> Bson {
    match value {
        GeneratedValue::Null => Bson::Null,
        GeneratedValue::Bool(b) => Bson::Boolean(*b),
        GeneratedValue::Int32(i) => Bson::Int32(*i),
        GeneratedValue::Int64(i) => Bson::Int64(*i),
        GeneratedValue::Float64(f) => Bson::Double(*f),
        GeneratedValue::String(s) => Bson::String(s.clone()),

        // Decimal128 when the text parses, string otherwise
        GeneratedValue::Decimal { value, .. } => match Decimal128::from_str(value) {
            Ok(d) => Bson::Decimal128(d),
            Err(_) => Bson::String(value.clone()),
        },

        // MongoDB has a native UUID binary subtype
        GeneratedValue::Uuid(u) => Bson::Binary(bson::Binary {
            subtype: bson::spec::BinarySubtype::Uuid,
            bytes: u.as_bytes().to_vec(),
        }),

        // Millisecond precision
        GeneratedValue::DateTime(dt) => Bson::DateTime(BsonDateTime::from_chrono(*dt)),

        GeneratedValue::Array(items) => Bson::Array(items.iter().map(value_to_bson).collect()),
        GeneratedValue::Object(fields) => Bson::Document(fields_to_bson(fields)),
    }
}

/// Convert a serde_json::Value to a BSON value.
pub fn json_value_to_bson(json: &serde_json::Value) -> Bson {
    match json {
        serde_json::Value::Null => Bson::Null,
        serde_json::Value::Bool(b) => Bson::Boolean(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                if i >= i32::MIN as i64 && i <= i32::MAX as i64 {
                    Bson::Int32(i as i32)
                } else {
                    Bson::Int64(i)
                }
            } else if let Some(f) = n.as_f64() {
                Bson::Double(f)
            } else {
                Bson::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => Bson::String(s.clone()),
        serde_json::Value::Array(arr) => Bson::Array(arr.iter().map(json_value_to_bson).collect()),
        serde_json::Value::Object(obj) => Bson::Document(json_object_to_bson_doc(obj)),
    }
}

/// Convert a serde_json::Map to a BSON Document.
pub fn json_object_to_bson_doc(map: &serde_json::Map<String, serde_json::Value>) -> Document {
    let mut doc = Document::new();
    for (key, value) in map {
        doc.insert(key.clone(), json_value_to_bson(value));
    }
    doc
}
