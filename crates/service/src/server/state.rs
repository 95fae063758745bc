//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::crypto::{MessageSigningStrategy, ValueEncryptionStrategy};

use super::middleware::ClientRateLimiter;

/// Application state shared across all request handlers.
///
/// All fields are `Arc`-wrapped so that Axum can clone the state for each
/// request without copying key material.
#[derive(Clone)]
pub struct AppState {
    /// Strategy applied by `/encrypt` and `/decrypt`.
    pub encryption: Arc<dyn ValueEncryptionStrategy>,
    /// Strategy applied by `/sign` and `/verify`.
    pub signing: Arc<dyn MessageSigningStrategy>,
    /// Per-client request quota.
    pub rate_limiter: Arc<ClientRateLimiter>,
}

impl AppState {
    /// Create a new [`AppState`] from already-built strategies.
    pub fn new(
        encryption: Arc<dyn ValueEncryptionStrategy>,
        signing: Arc<dyn MessageSigningStrategy>,
        rate_limiter: Arc<ClientRateLimiter>,
    ) -> Self {
        Self {
            encryption,
            signing,
            rate_limiter,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// Base64 encryption, HMAC key `K`, and a generous rate limit.
    pub fn for_tests() -> Self {
        use std::num::NonZeroU32;

        use crate::crypto::{Base64Strategy, HmacSha256Strategy};

        Self::new(
            Arc::new(Base64Strategy::new()),
            Arc::new(HmacSha256Strategy::new(b"K").unwrap()),
            Arc::new(ClientRateLimiter::per_second(NonZeroU32::new(10_000).unwrap())),
        )
    }
}
