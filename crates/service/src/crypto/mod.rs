//! Cryptographic core: canonical serialization, value-encryption and signing
//! strategies, the per-field transformer, and signature verification.
//!
//! This module is free of HTTP and configuration concerns. Transports reach it
//! only through [`ValueEncryptionStrategy`] and [`MessageSigningStrategy`],
//! built once at startup by [`build_encryption`] and [`build_signing`].
//!
//! # Invariants
//!
//! - Strategies own their key material and never expose it, not even via `Debug`.
//! - Every call is a pure function of (key, input); nothing is shared between
//!   calls except the immutable keyed primitive.
//! - Transforms are all-or-nothing: the first failing entry aborts the call.

pub mod aead;
pub mod canonical;
pub mod encoding;
pub mod error;
pub mod signing;
pub mod strategy;
pub mod transform;
pub mod verify;

use std::sync::Arc;

use serde::Deserialize;

pub use aead::AesGcmStrategy;
pub use encoding::Base64Strategy;
pub use error::{CryptoError, FieldError};
pub use signing::HmacSha256Strategy;
pub use strategy::{MessageSigningStrategy, ValueEncryptionStrategy};
pub use verify::{verify_signature, Verification};

/// Which value-encryption strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EncryptionAlgorithm {
    /// Base64 encoding only. Provides no confidentiality.
    #[serde(rename = "base64")]
    Base64,
    /// AES-256-GCM with a random nonce per value.
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

/// Build the configured value-encryption strategy.
///
/// `key` is ignored for [`EncryptionAlgorithm::Base64`].
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKeyLength`] if AES-256-GCM is selected and the
/// key is missing or not 32 bytes.
pub fn build_encryption(
    algorithm: EncryptionAlgorithm,
    key: Option<&[u8]>,
) -> Result<Arc<dyn ValueEncryptionStrategy>, CryptoError> {
    match algorithm {
        EncryptionAlgorithm::Base64 => Ok(Arc::new(Base64Strategy::new())),
        EncryptionAlgorithm::Aes256Gcm => {
            let key = key.ok_or(CryptoError::InvalidKeyLength(0))?;
            Ok(Arc::new(AesGcmStrategy::new(key)?))
        }
    }
}

/// Build the HMAC-SHA256 signing strategy.
///
/// # Errors
///
/// Returns [`CryptoError::EmptyKey`] if `key` is empty.
pub fn build_signing(key: &[u8]) -> Result<Arc<dyn MessageSigningStrategy>, CryptoError> {
    Ok(Arc::new(HmacSha256Strategy::new(key)?))
}
