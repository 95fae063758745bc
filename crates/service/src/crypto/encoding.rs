//! Base64 value "encryption".
//!
//! **This is an encoding, not encryption.** It provides no confidentiality and
//! no integrity: anyone can decode the output, and altered values are only
//! caught if they stop being valid Base64 or JSON. Use [`super::AesGcmStrategy`]
//! for anything that must stay secret.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::Payload;
use serde_json::Value;

use super::{transform, CryptoError, FieldError, ValueEncryptionStrategy};

/// Encodes each canonical value with standard, padded Base64.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Strategy;

impl Base64Strategy {
    pub fn new() -> Self {
        Self
    }

    fn encode(plaintext: &[u8]) -> Result<String, CryptoError> {
        Ok(STANDARD.encode(plaintext))
    }

    fn decode(encoded: &str) -> Result<Value, CryptoError> {
        let bytes = STANDARD.decode(encoded).map_err(|_| CryptoError::Decode)?;
        serde_json::from_slice(&bytes).map_err(|_| CryptoError::MalformedCiphertext)
    }
}

impl ValueEncryptionStrategy for Base64Strategy {
    fn name(&self) -> &'static str {
        "base64"
    }

    fn encrypt(&self, payload: &Payload) -> Result<Payload, FieldError> {
        transform::encrypt_fields(payload, Self::encode)
    }

    fn decrypt(&self, payload: &Payload) -> Result<Payload, FieldError> {
        transform::decrypt_fields(payload, Self::decode)
    }
}
