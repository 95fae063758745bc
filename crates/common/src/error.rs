//! Transport-level error taxonomy.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::InvalidSignature`] → 400
/// - [`ServiceError::RateLimited`] → 429
/// - [`ServiceError::CryptoFailure`] → 500
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: not a JSON object, a value of the wrong type,
    /// or ciphertext that cannot be decoded or authenticated.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The signature was recomputed successfully but does not match.
    #[error("invalid signature")]
    InvalidSignature,

    /// The caller exceeded its request quota.
    #[error("too many requests, please try later")]
    RateLimited,

    /// A cryptographic operation failed for reasons not attributable to the caller.
    #[error("crypto failure: {0}")]
    CryptoFailure(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::InvalidSignature => 400,
            ServiceError::RateLimited => 429,
            ServiceError::CryptoFailure(_) => 500,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code placed in the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::InvalidSignature => "invalid_signature",
            ServiceError::RateLimited => "rate_limited",
            ServiceError::CryptoFailure(_) => "crypto_failure",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::InvalidSignature.http_status(), 400);
        assert_eq!(ServiceError::RateLimited.http_status(), 429);
        assert_eq!(ServiceError::CryptoFailure("x".into()).http_status(), 500);
        assert_eq!(ServiceError::Internal("x".into()).http_status(), 500);
    }

    #[test]
    fn broken_request_and_mismatch_have_distinct_codes() {
        let broken = ServiceError::BadRequest("unserializable".into());
        let mismatch = ServiceError::InvalidSignature;
        assert_eq!(broken.http_status(), mismatch.http_status());
        assert_ne!(broken.code(), mismatch.code());
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::BadRequest("request body must be a JSON object".into());
        assert!(e.to_string().contains("must be a JSON object"));
    }
}
