//! Errors produced by the cryptographic core.

use common::ServiceError;
use thiserror::Error;

use super::aead::KEY_LEN;

/// Errors produced by a single encode/seal/open/sign step.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// A value has no canonical JSON encoding.
    #[error("value cannot be serialized: {0}")]
    Serialization(String),

    /// A value expected to hold an encoded string held another JSON type.
    #[error("values must be strings")]
    InvalidValueType,

    /// The value is not valid standard Base64.
    #[error("value is not valid base64")]
    Decode,

    /// The decoded ciphertext is shorter than a nonce.
    #[error("invalid ciphertext")]
    InvalidCiphertext,

    /// Tag verification failed. Tampering and corruption are not distinguished.
    #[error("ciphertext could not be authenticated")]
    AuthenticationFailed,

    /// Authenticated plaintext did not parse as JSON.
    #[error("decrypted plaintext is not valid JSON")]
    MalformedPlaintext,

    /// Base64-decoded bytes did not parse as JSON.
    #[error("decoded value is not valid JSON")]
    MalformedCiphertext,

    /// The AES key is not exactly [`KEY_LEN`] bytes.
    #[error("invalid key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// HMAC key material of length zero.
    #[error("signing key must not be empty")]
    EmptyKey,

    /// AES-GCM sealing failed (unreachable with a valid key and nonce).
    #[error("aead operation failed")]
    AeadFailure,
}

impl CryptoError {
    /// `true` when the error was caused by the caller's input rather than by
    /// the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CryptoError::InvalidValueType
                | CryptoError::Decode
                | CryptoError::InvalidCiphertext
                | CryptoError::AuthenticationFailed
                | CryptoError::MalformedPlaintext
                | CryptoError::MalformedCiphertext
        )
    }
}

impl From<serde_json::Error> for CryptoError {
    fn from(err: serde_json::Error) -> Self {
        CryptoError::Serialization(err.to_string())
    }
}

/// The first entry of a payload that failed to transform.
#[derive(Debug, Error)]
#[error("field `{field}`: {source}")]
pub struct FieldError {
    /// Key of the failing entry.
    pub field: String,
    /// What went wrong.
    #[source]
    pub source: CryptoError,
}

impl FieldError {
    pub fn new(field: impl Into<String>, source: CryptoError) -> Self {
        Self {
            field: field.into(),
            source,
        }
    }
}

impl From<FieldError> for ServiceError {
    fn from(err: FieldError) -> Self {
        if err.source.is_client_error() {
            ServiceError::BadRequest(err.to_string())
        } else {
            ServiceError::CryptoFailure(err.to_string())
        }
    }
}

impl From<CryptoError> for ServiceError {
    fn from(err: CryptoError) -> Self {
        if err.is_client_error() {
            ServiceError::BadRequest(err.to_string())
        } else {
            ServiceError::CryptoFailure(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        let err = FieldError::new("key1", CryptoError::AuthenticationFailed);
        let svc: ServiceError = err.into();
        assert_eq!(svc.http_status(), 400);
        assert!(svc.to_string().contains("key1"));
    }

    #[test]
    fn service_errors_map_to_crypto_failure() {
        let svc: ServiceError = CryptoError::AeadFailure.into();
        assert_eq!(svc.http_status(), 500);
        let svc: ServiceError = CryptoError::Serialization("boom".into()).into();
        assert_eq!(svc.code(), "crypto_failure");
    }

    #[test]
    fn auth_failure_message_does_not_say_why() {
        let msg = CryptoError::AuthenticationFailed.to_string();
        assert!(!msg.contains("tamper"));
        assert!(!msg.contains("key"));
    }
}
