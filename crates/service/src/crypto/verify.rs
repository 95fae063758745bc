//! Signature verification protocol.
//!
//! Keeps "the request was broken" and "the signature did not match" apart:
//! the first is an error, the second an ordinary [`Verification::Mismatch`].

use common::Payload;

use super::{CryptoError, MessageSigningStrategy};

/// Outcome of checking a signature that could be recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    Mismatch,
}

/// Check `signature` against `data` under `signer`'s key.
///
/// # Errors
///
/// Returns the signer's error when the expected signature cannot be computed.
pub fn verify_signature(
    signer: &dyn MessageSigningStrategy,
    data: &Payload,
    signature: &str,
) -> Result<Verification, CryptoError> {
    if signer.verify(data, signature)? {
        Ok(Verification::Verified)
    } else {
        Ok(Verification::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::strategy::MockMessageSigningStrategy;
    use crate::crypto::test_support::payload;
    use crate::crypto::HmacSha256Strategy;
    use serde_json::json;

    #[test]
    fn sign_then_verify() {
        let signer = HmacSha256Strategy::new(b"K").unwrap();
        let data = payload(json!({"key1": "value1"}));
        let sig = signer.sign(&data).unwrap();

        assert_eq!(
            verify_signature(&signer, &data, &sig).unwrap(),
            Verification::Verified
        );
        assert_eq!(
            verify_signature(&signer, &payload(json!({"key1": "value2"})), &sig).unwrap(),
            Verification::Mismatch
        );
        assert_eq!(
            verify_signature(&signer, &data, "tampered").unwrap(),
            Verification::Mismatch
        );
    }

    #[test]
    fn recompute_failure_is_an_error() {
        let mut signer = MockMessageSigningStrategy::new();
        signer
            .expect_verify()
            .returning(|_, _| Err(CryptoError::Serialization("unrepresentable".into())));

        let result = verify_signature(&signer, &Payload::new(), "sig");
        assert!(matches!(result, Err(CryptoError::Serialization(_))));
    }

    #[test]
    fn mismatch_is_not_an_error() {
        let mut signer = MockMessageSigningStrategy::new();
        signer.expect_verify().times(1).returning(|_, _| Ok(false));

        let outcome = verify_signature(&signer, &Payload::new(), "sig").unwrap();
        assert_eq!(outcome, Verification::Mismatch);
    }
}
