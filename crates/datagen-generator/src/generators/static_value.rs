//! Static value generator and JSON to GeneratedValue conversion.

use datagen_core::GeneratedValue;
use serde_json::Value;

/// Convert a JSON config value to a GeneratedValue.
pub fn json_to_generated_value(json: &Value) -> GeneratedValue {
    match json {
        Value::Null => GeneratedValue::Null,
        Value::Bool(b) => GeneratedValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                match i32::try_from(i) {
                    Ok(small) => GeneratedValue::Int32(small),
                    Err(_) => GeneratedValue::Int64(i),
                }
            } else if let Some(f) = n.as_f64() {
                GeneratedValue::Float64(f)
            } else {
                GeneratedValue::String(n.to_string())
            }
        }
        Value::String(s) => GeneratedValue::String(s.clone()),
        Value::Array(arr) => GeneratedValue::Array(arr.iter().map(json_to_generated_value).collect()),
        Value::Object(map) => GeneratedValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_generated_value(v)))
                .collect(),
        ),
    }
}
