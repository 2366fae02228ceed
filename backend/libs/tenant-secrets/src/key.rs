use crate::error::SecretError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Symmetric HMAC key bytes. Cheap to clone, never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(Arc<[u8]>);

impl SigningKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::from(bytes.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey([REDACTED; {} bytes])", self.0.len())
    }
}

/// A fetched key plus fetch metadata
///
/// Expiry is enforced by the provider cache; these fields are informational.
/// Replaced as a whole on refresh; never mutated in place.
#[derive(Debug, Clone)]
pub struct SecretMaterial {
    pub key: SigningKey,
    pub fetched_at: DateTime<Utc>,
    /// `None` means the key is kept for the lifetime of the provider.
    pub ttl: Option<Duration>,
}

/// Extract the base64 key stored under `key_field` in a JSON secret record.
///
/// ```
/// use tenant_secrets::parse_key_record;
///
/// let key = parse_key_record(r#"{"tenantctx_hmac_key":"a2V5"}"#, "tenantctx_hmac_key").unwrap();
/// assert_eq!(key.as_bytes(), b"key");
/// ```
pub fn parse_key_record(record: &str, key_field: &str) -> Result<SigningKey, SecretError> {
    let json: serde_json::Value = serde_json::from_str(record)
        .map_err(|e| SecretError::InvalidFormat(format!("Secret is not a JSON object: {}", e)))?;

    let encoded = json
        .get(key_field)
        .ok_or_else(|| SecretError::InvalidFormat(format!("Missing field {}", key_field)))?
        .as_str()
        .ok_or_else(|| SecretError::InvalidFormat(format!("Field {} is not a string", key_field)))?;

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| SecretError::InvalidFormat(format!("Field {} is not base64: {}", key_field, e)))?;

    if bytes.is_empty() {
        return Err(SecretError::InvalidFormat(format!("Field {} is empty", key_field)));
    }

    Ok(SigningKey::new(bytes))
}
