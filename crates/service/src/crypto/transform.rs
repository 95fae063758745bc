//! Per-field transformation protocol.
//!
//! Applies a value-level seal/open function to every top-level entry of a
//! payload independently. Entries are processed in key order and the first
//! failure aborts the whole call, tagged with the failing key.

use common::Payload;
use serde_json::Value;

use super::{canonical, CryptoError, FieldError};

/// Canonical-serialize each value and replace it with the string produced by `seal`.
pub fn encrypt_fields<F>(payload: &Payload, seal: F) -> Result<Payload, FieldError>
where
    F: Fn(&[u8]) -> Result<String, CryptoError>,
{
    let mut out = Payload::new();
    for (key, value) in payload {
        let plaintext = canonical::to_vec(value).map_err(|e| FieldError::new(key, e))?;
        let sealed = seal(&plaintext).map_err(|e| FieldError::new(key, e))?;
        out.insert(key.clone(), Value::String(sealed));
    }
    Ok(out)
}

/// Require each value to be a string and replace it with the JSON value
/// recovered by `open`.
pub fn decrypt_fields<F>(payload: &Payload, open: F) -> Result<Payload, FieldError>
where
    F: Fn(&str) -> Result<Value, CryptoError>,
{
    let mut out = Payload::new();
    for (key, value) in payload {
        let Value::String(sealed) = value else {
            return Err(FieldError::new(key, CryptoError::InvalidValueType));
        };
        let restored = open(sealed).map_err(|e| FieldError::new(key, e))?;
        out.insert(key.clone(), restored);
    }
    Ok(out)
}
