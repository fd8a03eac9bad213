//! JSON transcoding.
//!
//! Texts become JSON strings, lists become arrays and maps become objects.
//! Object keys come out sorted, which matches the order `record` already
//! uses for the header; node keys happen to sort the same way too.

use super::Shape;

/// Encode a shape as pretty-printed JSON.
pub fn encode(shape: &Shape) -> Result<String, String> {
    serde_json::to_string_pretty(&shape_to_json(shape))
        .map_err(|e| format!("JSON encode error: {}", e))
}

fn shape_to_json(shape: &Shape) -> serde_json::Value {
    match shape {
        Shape::Text(s) => serde_json::Value::String(s.clone()),
        Shape::List(items) => serde_json::Value::Array(items.iter().map(shape_to_json).collect()),
        Shape::Map(entries) => {
            let mut obj = serde_json::Map::new();
            for (key, value) in entries {
                obj.insert(key.clone(), shape_to_json(value));
            }
            serde_json::Value::Object(obj)
        }
    }
}
