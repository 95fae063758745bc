//! Deterministic JSON encoding shared by signing and per-field encryption.
//!
//! Output is compact JSON with object keys sorted by byte order at every
//! depth, so two logically equal values always produce identical bytes
//! regardless of how their maps were built.

use serde_json::Value;

use super::CryptoError;

/// Canonical bytes of a single JSON value.
pub fn to_vec(value: &Value) -> Result<Vec<u8>, CryptoError> {
    let mut out = Vec::with_capacity(64);
    write_value(&mut out, value)?;
    Ok(out)
}

/// Canonical bytes of a whole payload, encoded as one JSON object.
pub fn payload_to_vec(payload: &common::Payload) -> Result<Vec<u8>, CryptoError> {
    let mut out = Vec::with_capacity(128);
    write_object(&mut out, payload)?;
    Ok(out)
}

fn write_value(out: &mut Vec<u8>, value: &Value) -> Result<(), CryptoError> {
    match value {
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(out, item)?;
            }
            out.push(b']');
        }
        Value::Object(map) => write_object(out, map)?,
        // Scalars have exactly one compact encoding.
        scalar => serde_json::to_writer(&mut *out, scalar)?,
    }
    Ok(())
}

fn write_object(
    out: &mut Vec<u8>,
    map: &serde_json::Map<String, Value>,
) -> Result<(), CryptoError> {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    out.push(b'{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        serde_json::to_writer(&mut *out, key)?;
        out.push(b':');
        write_value(out, value)?;
    }
    out.push(b'}');
    Ok(())
}
