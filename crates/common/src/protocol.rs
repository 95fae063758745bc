//! Request and response types exchanged with callers.
//!
//! `/encrypt`, `/decrypt` and `/sign` take a bare [`Payload`] as their body;
//! only `/verify` wraps it in an envelope.

use serde::{Deserialize, Serialize};

/// A flat JSON object: string keys mapped to arbitrary JSON values.
///
/// Only the top level is transformed. Nested arrays and objects are treated as
/// opaque values.
pub type Payload = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Sign / verify endpoints
// ---------------------------------------------------------------------------

/// Successful response body for `POST /sign`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignResponse {
    /// Base64-encoded HMAC-SHA256 tag over the canonical form of the payload.
    pub signature: String,
}

/// Request body for `POST /verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// Signature previously returned by `POST /sign`.
    pub signature: String,
    /// The payload the signature is claimed to cover.
    pub data: Payload,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status, always `"ok"` once the server is listening.
    pub status: String,
    /// Name of the configured value-encryption strategy.
    pub encryption: String,
    /// Name of the configured message-signing strategy.
    pub signing: String,
}
