//! CBOR transcoding.
//!
//! Texts become text strings, lists become determinate-length arrays and maps
//! become maps with text keys, in the order `record` gives them.

use super::Shape;
use ciborium::value::Value as CborValue;

/// Encode a shape as CBOR bytes.
pub fn encode(shape: &Shape) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(&shape_to_cbor(shape), &mut buf)
        .map_err(|e| format!("CBOR encode error: {}", e))?;
    Ok(buf)
}

fn shape_to_cbor(shape: &Shape) -> CborValue {
    match shape {
        Shape::Text(s) => CborValue::Text(s.clone()),
        Shape::List(items) => CborValue::Array(items.iter().map(shape_to_cbor).collect()),
        Shape::Map(entries) => CborValue::Map(
            entries
                .iter()
                .map(|(key, value)| (CborValue::Text(key.clone()), shape_to_cbor(value)))
                .collect(),
        ),
    }
}
