//! AES-256-GCM authenticated value encryption.
//!
//! # Ciphertext format
//!
//! ```text
//! base64(nonce[12] ‖ ciphertext ‖ tag[16])
//! ```
//!
//! A fresh 96-bit nonce is drawn from the OS CSPRNG for every value sealed.
//! Uniqueness is probabilistic only: nothing tracks nonces across calls, so
//! the collision risk grows with the number of values sealed under one key
//! (negligible in a 2^96 space, but not zero under very high volume).

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::Payload;
use serde_json::Value;

use super::{transform, CryptoError, FieldError, ValueEncryptionStrategy};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// Seals each canonical value with AES-256-GCM under a key fixed at construction.
///
/// The keyed cipher is built once and shared read-only by every call.
#[derive(Clone)]
pub struct AesGcmStrategy {
    cipher: Aes256Gcm,
}

impl AesGcmStrategy {
    /// Build the strategy from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] unless `key` is exactly [`KEY_LEN`] bytes.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_LEN {
            return Err(CryptoError::InvalidKeyLength(key.len()));
        }
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?;
        Ok(Self { cipher })
    }

    fn seal(&self, plaintext: &[u8]) -> Result<String, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|_| CryptoError::AeadFailure)?;

        let mut framed = Vec::with_capacity(NONCE_LEN + plaintext.len() + TAG_LEN);
        framed.extend_from_slice(&nonce_bytes);
        framed.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(framed))
    }

    fn open(&self, encoded: &str) -> Result<Value, CryptoError> {
        let framed = STANDARD.decode(encoded).map_err(|_| CryptoError::Decode)?;
        if framed.len() < NONCE_LEN {
            return Err(CryptoError::InvalidCiphertext);
        }
        let (nonce, ciphertext) = framed.split_at(NONCE_LEN);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::AuthenticationFailed)?;

        serde_json::from_slice(&plaintext).map_err(|_| CryptoError::MalformedPlaintext)
    }
}

impl std::fmt::Debug for AesGcmStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AesGcmStrategy([REDACTED])")
    }
}

impl ValueEncryptionStrategy for AesGcmStrategy {
    fn name(&self) -> &'static str {
        "aes-256-gcm"
    }

    fn encrypt(&self, payload: &Payload) -> Result<Payload, FieldError> {
        transform::encrypt_fields(payload, |plaintext| self.seal(plaintext))
    }

    fn decrypt(&self, payload: &Payload) -> Result<Payload, FieldError> {
        transform::decrypt_fields(payload, |encoded| self.open(encoded))
    }
}
