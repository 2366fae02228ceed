use crate::error::{Result, TokenError};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

/// Signed claims carried by a tenant-context token
///
/// Field order is fixed by the struct layout so the serialized JSON is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContextPayload {
    #[serde(rename = "tid")]
    pub tenant_id: String,
    /// Expiry (Unix seconds)
    #[serde(rename = "exp")]
    pub expires_at: i64,
    #[serde(rename = "kid")]
    pub key_id: String,
}

impl TenantContextPayload {
    pub fn new(tenant_id: impl Into<String>, expires_at: i64, key_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            expires_at,
            key_id: key_id.into(),
        }
    }

    /// Expired strictly before `now`; a token is still valid at `exp == now`
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at < now
    }

    /// Serialize and base64url-encode (the exact string that gets signed)
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    pub fn decode(segment: &str) -> Result<Self> {
        let json = URL_SAFE_NO_PAD
            .decode(segment)
            .map_err(|e| TokenError::MalformedToken(format!("payload is not base64url: {}", e)))?;

        serde_json::from_slice(&json)
            .map_err(|e| TokenError::MalformedToken(format!("payload is not valid JSON: {}", e)))
    }
}
