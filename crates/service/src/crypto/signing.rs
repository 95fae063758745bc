//! HMAC-SHA256 signatures over whole payloads.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::Payload;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{canonical, CryptoError, MessageSigningStrategy};

type HmacSha256 = Hmac<Sha256>;

/// Byte length of an HMAC-SHA256 tag before Base64 encoding.
pub const SIGNATURE_LEN: usize = 32;

/// Signs the canonical encoding of a payload with a key fixed at construction.
///
/// The keyed MAC state is computed once; every call works on its own clone.
#[derive(Clone)]
pub struct HmacSha256Strategy {
    mac: HmacSha256,
}

impl HmacSha256Strategy {
    /// Build the strategy from secret key bytes of any non-zero length.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::EmptyKey`] if `key` is empty.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.is_empty() {
            return Err(CryptoError::EmptyKey);
        }
        let mac = HmacSha256::new_from_slice(key).map_err(|_| CryptoError::EmptyKey)?;
        Ok(Self { mac })
    }

    fn keyed(&self, payload: &Payload) -> Result<HmacSha256, CryptoError> {
        let message = canonical::payload_to_vec(payload)?;
        let mut mac = self.mac.clone();
        mac.update(&message);
        Ok(mac)
    }
}

impl std::fmt::Debug for HmacSha256Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HmacSha256Strategy([REDACTED])")
    }
}

impl MessageSigningStrategy for HmacSha256Strategy {
    fn name(&self) -> &'static str {
        "hmac-sha256"
    }

    fn sign(&self, payload: &Payload) -> Result<String, CryptoError> {
        let tag = self.keyed(payload)?.finalize().into_bytes();
        Ok(STANDARD.encode(tag))
    }

    fn verify(&self, payload: &Payload, signature: &str) -> Result<bool, CryptoError> {
        let mac = self.keyed(payload)?;
        // Strict decoding keeps the Base64 form canonical, so a tag match here
        // is the same as an exact match on the signature string.
        let Ok(provided) = STANDARD.decode(signature) else {
            return Ok(false);
        };
        if provided.len() != SIGNATURE_LEN {
            return Ok(false);
        }
        Ok(mac.verify_slice(&provided).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::test_support::payload;
    use serde_json::json;

    const SIGNING_KEY_TEST_1: &[u8] =
        b"7b03af03735a58b17fa00804dbf683b64ab30f29d2684893fc33759ae19f02c4";
    const SIGNING_KEY_TEST_2: &[u8] =
        b"BDCF65F17D9AFB2949658D21FD41F4833C4E0CE80E25720079422A58D6FD60F8";

    fn signer(key: &[u8]) -> HmacSha256Strategy {
        HmacSha256Strategy::new(key).unwrap()
    }

    #[test]
    fn empty_key_rejected() {
        assert!(matches!(
            HmacSha256Strategy::new(b"").unwrap_err(),
            CryptoError::EmptyKey
        ));
    }

    #[test]
    fn short_key_accepted() {
        assert!(HmacSha256Strategy::new(b"k").is_ok());
    }

    #[test]
    fn known_answer() {
        let s = signer(SIGNING_KEY_TEST_1);
        assert_eq!(
            s.sign(&payload(json!({"key1": "value1"}))).unwrap(),
            "cJPPgZbzRuRhQNR8loSgf1TEJgmIuk68yu1P+kWv1C4="
        );
        assert_eq!(
            s.sign(&payload(json!({"key1": "value1", "key2": "value2"})))
                .unwrap(),
            "ZT2spy0WsuJaRgx68WwjnsIEMsqBZ8wAzyZO7ONQ/Yo="
        );
    }

    #[test]
    fn signature_is_fixed_length() {
        let sig = signer(SIGNING_KEY_TEST_1)
            .sign(&payload(json!({"anything": [1, 2, 3]})))
            .unwrap();
        assert_eq!(STANDARD.decode(sig).unwrap().len(), SIGNATURE_LEN);
    }

    #[test]
    fn signing_is_deterministic_and_order_independent() {
        let s = signer(SIGNING_KEY_TEST_1);
        let mut a = Payload::new();
        a.insert("key2".into(), json!("value2"));
        a.insert("key1".into(), json!({"y": 1, "x": 2}));
        let mut b = Payload::new();
        b.insert("key1".into(), json!({"x": 2, "y": 1}));
        b.insert("key2".into(), json!("value2"));

        let sig = s.sign(&a).unwrap();
        assert_eq!(sig, s.sign(&a).unwrap());
        assert_eq!(sig, s.sign(&b).unwrap());
    }

    #[test]
    fn verify_positive() {
        let s = signer(SIGNING_KEY_TEST_1);
        let data = payload(json!({"key1": "value1", "key2": "value2"}));
        let sig = s.sign(&data).unwrap();
        assert!(s.verify(&data, &sig).unwrap());
    }

    #[test]
    fn verify_wrong_data() {
        let s = signer(SIGNING_KEY_TEST_1);
        let sig = s.sign(&payload(json!({"key1": "value1"}))).unwrap();
        assert!(!s.verify(&payload(json!({"key1": "value2"})), &sig).unwrap());
        assert!(!s
            .verify(&payload(json!({"key1": "value1", "extra": 1})), &sig)
            .unwrap());
    }

    #[test]
    fn verify_signature_from_other_key() {
        let data = payload(json!({"key1": "value1", "key2": "value2"}));
        let sig = signer(SIGNING_KEY_TEST_2).sign(&data).unwrap();
        assert!(!signer(SIGNING_KEY_TEST_1).verify(&data, &sig).unwrap());
    }

    #[test]
    fn verify_garbage_signature_is_mismatch_not_error() {
        let s = signer(SIGNING_KEY_TEST_1);
        let data = payload(json!({"key1": "value1"}));
        let sig = s.sign(&data).unwrap();
        for bad in ["tampered", "", "data-for-signature-1", "AAAA"] {
            assert!(!s.verify(&data, bad).unwrap(), "{bad:?}");
        }
        assert!(!s.verify(&data, &format!(" {sig}")).unwrap());
        assert!(!s.verify(&data, &sig[..sig.len() - 4]).unwrap());
    }

    #[test]
    fn debug_does_not_leak_key() {
        assert_eq!(
            format!("{:?}", signer(SIGNING_KEY_TEST_1)),
            "HmacSha256Strategy([REDACTED])"
        );
    }
}
