// Token signing - HMAC-SHA256 over the encoded payload segment
// Pure functions: the key and the clock are passed in

use crate::error::{Result, TokenError};
use crate::payload::TenantContextPayload;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tenant_secrets::SigningKey;

type HmacSha256 = Hmac<Sha256>;

/// A token split into its two segments, not yet verified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedToken<'a> {
    payload_segment: &'a str,
    signature_segment: &'a str,
}

impl<'a> SignedToken<'a> {
    /// Split on `.`; exactly two non-empty segments are accepted
    pub fn parse(token: &'a str) -> Result<Self> {
        let mut parts = token.split('.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(payload), Some(signature), None)
                if !payload.is_empty() && !signature.is_empty() =>
            {
                Ok(Self {
                    payload_segment: payload,
                    signature_segment: signature,
                })
            }
            _ => Err(TokenError::MalformedToken(
                "expected <payload>.<signature>".to_string(),
            )),
        }
    }

    /// Parse the token carried by a cookie value
    ///
    /// An absent or empty value is [`TokenError::MissingCredential`]; anything
    /// else goes through [`parse`](Self::parse).
    pub fn from_credential(value: Option<&'a str>) -> Result<Self> {
        match value.map(str::trim) {
            Some(token) if !token.is_empty() => Self::parse(token),
            _ => Err(TokenError::MissingCredential),
        }
    }

    pub fn payload_segment(&self) -> &'a str {
        self.payload_segment
    }

    pub fn signature_segment(&self) -> &'a str {
        self.signature_segment
    }

    /// Constant-time check of the signature segment against `key`
    ///
    /// An undecodable signature is reported as a mismatch, same as a forged one.
    pub fn verify_signature(&self, key: &SigningKey) -> Result<()> {
        let provided = URL_SAFE_NO_PAD
            .decode(self.signature_segment)
            .map_err(|_| TokenError::SignatureMismatch)?;

        let mut mac = mac_for(key)?;
        mac.update(self.payload_segment.as_bytes());
        mac.verify_slice(&provided)
            .map_err(|_| TokenError::SignatureMismatch)
    }

    /// Decode the payload. Only meaningful after `verify_signature`.
    pub fn decode_payload(&self) -> Result<TenantContextPayload> {
        TenantContextPayload::decode(self.payload_segment)
    }
}

/// Encode and sign a payload into the `<payload>.<signature>` token string
pub fn sign_payload(payload: &TenantContextPayload, key: &SigningKey) -> Result<String> {
    let encoded = payload.encode()?;

    let mut mac = mac_for(key)?;
    mac.update(encoded.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", encoded, signature))
}

/// Full verification: shape, signature, payload, expiry
///
/// `now` is the verification instant in Unix seconds. A token whose `exp`
/// equals `now` is still accepted.
pub fn verify_token(token: &str, key: &SigningKey, now: i64) -> Result<TenantContextPayload> {
    let signed = SignedToken::parse(token)?;
    signed.verify_signature(key)?;

    let payload = signed.decode_payload()?;
    if payload.is_expired_at(now) {
        return Err(TokenError::Expired {
            expired_at: payload.expires_at,
        });
    }

    Ok(payload)
}

fn mac_for(key: &SigningKey) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| TokenError::MalformedToken(format!("HMAC key rejected: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn key() -> SigningKey {
        SigningKey::new(b"test-hmac-key-for-development-only".to_vec())
    }

    fn token_for(tenant_id: &str, expires_at: i64) -> String {
        sign_payload(&TenantContextPayload::new(tenant_id, expires_at, "k1"), &key()).unwrap()
    }

    #[test]
    fn test_round_trip_recovers_tenant() {
        for tenant_id in ["tenant-customer1", "tenant-customer2", "", "ü-ñ/日本", "a.b.c"] {
            let token = token_for(tenant_id, NOW + 3600);
            let payload = verify_token(&token, &key(), NOW).unwrap();
            assert_eq!(payload.tenant_id, tenant_id);
            assert_eq!(payload.key_id, "k1");
        }
    }

    #[test]
    fn test_token_shape() {
        let token = token_for("tenant-customer1", NOW);
        let signed = SignedToken::parse(&token).unwrap();
        // 32-byte HMAC, base64url without padding
        assert_eq!(signed.signature_segment().len(), 43);
        assert!(!token.contains('='));
    }

    #[test]
    fn test_wrong_segment_count_is_malformed() {
        for token in ["", "abc", "a.b.c", "a.b.c.d", ".", "a.", ".b", ".."] {
            assert!(
                matches!(SignedToken::parse(token), Err(TokenError::MalformedToken(_))),
                "token {:?} should be malformed",
                token
            );
        }
    }

    #[test]
    fn test_absent_credential_is_missing() {
        for value in [None, Some(""), Some("   ")] {
            assert!(
                matches!(
                    SignedToken::from_credential(value),
                    Err(TokenError::MissingCredential)
                ),
                "value {:?} should be missing",
                value
            );
        }

        assert!(matches!(
            SignedToken::from_credential(Some("abc")),
            Err(TokenError::MalformedToken(_))
        ));
        let token = token_for("tenant-customer1", NOW + 60);
        let signed = SignedToken::from_credential(Some(&token)).unwrap();
        assert!(signed.verify_signature(&key()).is_ok());
    }

    #[test]
    fn test_payload_bit_flip_is_signature_mismatch() {
        let token = token_for("tenant-customer1", NOW + 60);
        let signed = SignedToken::parse(&token).unwrap();
        let payload_bytes = URL_SAFE_NO_PAD.decode(signed.payload_segment()).unwrap();

        for byte in 0..payload_bytes.len() {
            for bit in 0..8 {
                let mut tampered = payload_bytes.clone();
                tampered[byte] ^= 1 << bit;
                let forged = format!(
                    "{}.{}",
                    URL_SAFE_NO_PAD.encode(&tampered),
                    signed.signature_segment()
                );
                assert!(matches!(
                    verify_token(&forged, &key(), NOW),
                    Err(TokenError::SignatureMismatch)
                ));
            }
        }
    }

    #[test]
    fn test_signature_bit_flip_is_signature_mismatch() {
        let token = token_for("tenant-customer1", NOW + 60);
        let signed = SignedToken::parse(&token).unwrap();
        let signature = URL_SAFE_NO_PAD.decode(signed.signature_segment()).unwrap();

        for byte in 0..signature.len() {
            for bit in 0..8 {
                let mut tampered = signature.clone();
                tampered[byte] ^= 1 << bit;
                let forged = format!(
                    "{}.{}",
                    signed.payload_segment(),
                    URL_SAFE_NO_PAD.encode(&tampered)
                );
                assert!(matches!(
                    verify_token(&forged, &key(), NOW),
                    Err(TokenError::SignatureMismatch)
                ));
            }
        }
    }

    #[test]
    fn test_truncated_or_undecodable_signature_is_mismatch() {
        let token = token_for("tenant-customer1", NOW + 60);
        let signed = SignedToken::parse(&token).unwrap();

        let truncated = format!("{}.{}", signed.payload_segment(), &signed.signature_segment()[..20]);
        assert!(matches!(
            verify_token(&truncated, &key(), NOW),
            Err(TokenError::SignatureMismatch)
        ));

        let garbage = format!("{}.{}", signed.payload_segment(), "!!not-base64!!");
        assert!(matches!(
            verify_token(&garbage, &key(), NOW),
            Err(TokenError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_other_key_is_signature_mismatch() {
        let token = token_for("tenant-customer1", NOW + 60);
        let other = SigningKey::new(b"another-key".to_vec());
        assert!(matches!(
            verify_token(&token, &other, NOW),
            Err(TokenError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_expiry_boundary() {
        let expired = token_for("t", NOW - 1);
        assert!(matches!(
            verify_token(&expired, &key(), NOW),
            Err(TokenError::Expired { expired_at }) if expired_at == NOW - 1
        ));

        assert!(verify_token(&token_for("t", NOW), &key(), NOW).is_ok());
        assert!(verify_token(&token_for("t", NOW + 1), &key(), NOW).is_ok());
    }

    #[test]
    fn test_signed_garbage_payload_is_malformed() {
        // Correctly signed, but the payload is not our JSON
        let encoded = URL_SAFE_NO_PAD.encode(b"[1,2,3]");
        let mut mac = mac_for(&key()).unwrap();
        mac.update(encoded.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        let token = format!("{}.{}", encoded, signature);
        assert!(matches!(
            verify_token(&token, &key(), NOW),
            Err(TokenError::MalformedToken(_))
        ));
    }
}
