//! Capability interfaces through which transports reach the core.
//!
//! Implementations hold only immutable key material, so a single instance can
//! be shared behind an `Arc` and called from any number of threads at once.

use common::Payload;

use super::{CryptoError, FieldError};

/// Encrypts and decrypts every top-level value of a [`Payload`].
///
/// Both directions are all-or-nothing: the first failing entry aborts the call
/// and no partial payload is returned.
#[cfg_attr(test, mockall::automock)]
pub trait ValueEncryptionStrategy: Send + Sync {
    /// Short identifier reported by the health endpoint.
    fn name(&self) -> &'static str;

    /// Replace every value with an opaque encoded string.
    fn encrypt(&self, payload: &Payload) -> Result<Payload, FieldError>;

    /// Restore every value from its encoded string.
    fn decrypt(&self, payload: &Payload) -> Result<Payload, FieldError>;
}

/// Computes and checks a keyed signature over a whole [`Payload`].
#[cfg_attr(test, mockall::automock)]
pub trait MessageSigningStrategy: Send + Sync {
    /// Short identifier reported by the health endpoint.
    fn name(&self) -> &'static str;

    /// Printable signature over the canonical form of `payload`.
    fn sign(&self, payload: &Payload) -> Result<String, CryptoError>;

    /// `Ok(false)` on mismatch; `Err` only when the signature cannot be recomputed.
    fn verify(&self, payload: &Payload, signature: &str) -> Result<bool, CryptoError>;
}
