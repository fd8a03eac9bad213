//! TOML transcoding.
//!
//! The top-level map becomes the document: `info` is written as a table,
//! while `tree` and `errors` are arrays. Nodes inside arrays are inline
//! tables, since TOML has no other way to nest tables within arrays.
//!
//! Lossy edges:
//!   - TOML has no null, so absent parts (a record with no tree, a node with
//!     no move) are simply left out, as in every other format.
//!   - Long records produce very long lines, because inline tables cannot
//!     span lines.

use super::Shape;
use toml_edit::{Array, DocumentMut, InlineTable, Item, Table, Value};

/// Encode a shape as a TOML document. The shape must be a map.
pub fn encode(shape: &Shape) -> Result<String, String> {
    let Shape::Map(entries) = shape else {
        return Err("TOML requires the top-level value to be a table".to_string());
    };

    let mut doc = DocumentMut::new();
    for (key, value) in entries {
        let item = match value {
            Shape::Map(inner) => Item::Table(shape_to_table(inner)),
            _ => Item::Value(shape_to_value(value)),
        };
        doc.insert(key, item);
    }
    Ok(doc.to_string())
}

fn shape_to_table(entries: &[(String, Shape)]) -> Table {
    let mut table = Table::new();
    for (key, value) in entries {
        table.insert(key, Item::Value(shape_to_value(value)));
    }
    table
}

fn shape_to_value(shape: &Shape) -> Value {
    match shape {
        Shape::Text(s) => Value::from(s.as_str()),
        Shape::List(items) => {
            let mut arr = Array::new();
            for item in items {
                arr.push(shape_to_value(item));
            }
            Value::Array(arr)
        }
        Shape::Map(entries) => {
            let mut inline = InlineTable::new();
            for (key, value) in entries {
                inline.insert(key.as_str(), shape_to_value(value));
            }
            Value::InlineTable(inline)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::record;
    use libsgf::parse;

    fn round_trip(text: &str) -> DocumentMut {
        encode(&record(&parse(text)).unwrap())
            .unwrap()
            .parse::<DocumentMut>()
            .unwrap()
    }

    #[test]
    fn test_encode_game() {
        let doc = round_trip("(;GM[1]PW[Cho];B[pd](;W[dd])(;W[dp]))");
        assert_eq!(doc["info"]["PW"].as_str(), Some("Cho"));

        let tree = doc["tree"].as_array().unwrap();
        assert_eq!(tree.len(), 1);
        let root = tree.get(0).unwrap().as_inline_table().unwrap();
        assert_eq!(
            root.get("move").and_then(|m| m.as_inline_table()).and_then(|m| m.get("value")).and_then(|v| v.as_str()),
            Some("pd")
        );
        assert_eq!(root.get("variations").and_then(|v| v.as_array()).map(|a| a.len()), Some(2));
    }

    #[test]
    fn test_missing_tree_is_omitted() {
        let doc = round_trip("(;GM[1])");
        assert!(doc.get("tree").is_none());
        assert_eq!(doc["errors"].as_array().map(|a| a.len()), Some(0));
    }

    #[test]
    fn test_rejects_non_table() {
        assert!(encode(&Shape::Text("x".to_string())).is_err());
    }
}
