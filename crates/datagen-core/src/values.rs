//! Value representations for generated documents.
//!
//! `GeneratedValue` is the store-agnostic value produced by the data
//! generator. Sinks convert it to their native format (BSON for MongoDB).

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Raw generated value before conversion to a store-specific type.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedValue {
    /// Boolean value
    Bool(bool),

    /// 32-bit signed integer
    Int32(i32),

    /// 64-bit signed integer
    Int64(i64),

    /// 64-bit floating point
    Float64(f64),

    /// String value
    String(String),

    /// UUID value
    Uuid(Uuid),

    /// Date/time in UTC
    DateTime(DateTime<Utc>),

    /// Decimal value stored as string with precision info
    Decimal {
        /// String representation of the decimal value
        value: String,
        /// Total number of digits
        precision: u8,
        /// Number of digits after decimal point
        scale: u8,
    },

    /// Array of values
    Array(Vec<GeneratedValue>),

    /// Nested object, fields kept in declaration order
    Object(Vec<(String, GeneratedValue)>),

    /// Null value
    Null,
}

impl GeneratedValue {
    /// Create a new decimal value.
    pub fn decimal(value: impl Into<String>, precision: u8, scale: u8) -> Self {
        Self::Decimal {
            value: value.into(),
            precision,
            scale,
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            Self::Int32(i) => Some(*i as i64),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an array.
    pub fn as_array(&self) -> Option<&[GeneratedValue]> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Look up a field of an object value.
    pub fn get(&self, key: &str) -> Option<&GeneratedValue> {
        match self {
            Self::Object(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Render this value as JSON, used for sample output.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int32(i) => Value::from(*i),
            Self::Int64(i) => Value::from(*i),
            Self::Float64(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::String(s) => Value::String(s.clone()),
            Self::Uuid(u) => Value::String(u.to_string()),
            Self::DateTime(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Decimal { value, .. } => Value::String(value.clone()),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Null => Value::Null,
        }
    }
}

/// One generated record.
///
/// Fields are stored in the order they were declared in the collection
/// config so that the document written to the store keeps that order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDocument {
    /// Position of this document in the generation sequence
    pub index: u64,

    /// Field values (name, value)
    pub fields: Vec<(String, GeneratedValue)>,
}

impl GeneratedDocument {
    /// Create a new generated document.
    pub fn new(index: u64, fields: Vec<(String, GeneratedValue)>) -> Self {
        Self { index, fields }
    }

    /// Get a field value by name.
    pub fn get_field(&self, name: &str) -> Option<&GeneratedValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Get the number of fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Render the document as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_value_accessors() {
        assert_eq!(GeneratedValue::Int64(100).as_i64(), Some(100));
        assert_eq!(GeneratedValue::Float64(3.15).as_f64(), Some(3.15));
        assert_eq!(
            GeneratedValue::String("test".to_string()).as_str(),
            Some("test")
        );

        // Cross-type conversions
        assert_eq!(GeneratedValue::Int32(42).as_i64(), Some(42));
        assert_eq!(GeneratedValue::Bool(true).as_i64(), None);
        assert!(GeneratedValue::Null.is_null());
    }

    #[test]
    fn test_object_lookup() {
        let obj = GeneratedValue::Object(vec![
            ("street".to_string(), GeneratedValue::String("Main".into())),
            ("zip".to_string(), GeneratedValue::Int32(12345)),
        ]);

        assert_eq!(obj.get("zip"), Some(&GeneratedValue::Int32(12345)));
        assert_eq!(obj.get("city"), None);
        assert_eq!(GeneratedValue::Null.get("zip"), None);
    }

    #[test]
    fn test_document_json_keeps_field_order() {
        let doc = GeneratedDocument::new(
            0,
            vec![
                ("zeta".to_string(), GeneratedValue::Int32(1)),
                ("alpha".to_string(), GeneratedValue::Bool(true)),
                ("mid".to_string(), GeneratedValue::decimal("1.50", 10, 2)),
            ],
        );

        let json = serde_json::to_string(&doc.to_json()).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":true,"mid":"1.50"}"#);
        assert_eq!(doc.field_count(), 3);
        assert_eq!(doc.get_field("alpha"), Some(&GeneratedValue::Bool(true)));
    }

    #[test]
    fn test_non_finite_float_renders_as_null() {
        assert_eq!(
            GeneratedValue::Float64(f64::NAN).to_json(),
            serde_json::Value::Null
        );
    }
}
