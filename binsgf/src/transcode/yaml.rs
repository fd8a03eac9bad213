//! YAML transcoding.
//!
//! Maps keep the order `record` gives them, so the header stays sorted and
//! each node lists its move before its other properties.

use super::Shape;

/// Encode a shape as a YAML document.
pub fn encode(shape: &Shape) -> Result<String, String> {
    serde_yaml::to_string(&shape_to_yaml(shape)).map_err(|e| format!("YAML encode error: {}", e))
}

fn shape_to_yaml(shape: &Shape) -> serde_yaml::Value {
    match shape {
        Shape::Text(s) => serde_yaml::Value::String(s.clone()),
        Shape::List(items) => serde_yaml::Value::Sequence(items.iter().map(shape_to_yaml).collect()),
        Shape::Map(entries) => {
            let mut map = serde_yaml::Mapping::new();
            for (key, value) in entries {
                map.insert(serde_yaml::Value::String(key.clone()), shape_to_yaml(value));
            }
            serde_yaml::Value::Mapping(map)
        }
    }
}
