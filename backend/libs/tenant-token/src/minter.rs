use crate::error::{Result, TokenError};
use crate::payload::TenantContextPayload;
use crate::signing::sign_payload;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tenant_secrets::SecretKeyProvider;
use tracing::{debug, info};

/// Identifier of the single active signing key
pub const DEFAULT_KEY_ID: &str = "k1";
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
/// Upper bound accepted from configuration (one week)
pub const MAX_TOKEN_TTL_MINUTES: i64 = 7 * 24 * 60;

/// Freshly minted token plus the expiry the cookie must carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedToken {
    pub token: String,
    /// Unix seconds, identical to the payload `exp`
    pub expires_at: i64,
}

/// Origin-side token minting
///
/// Signs with whatever key the provider returns at mint time. Outstanding
/// tokens are never re-signed.
#[derive(Clone)]
pub struct TokenMinter {
    keys: Arc<SecretKeyProvider>,
    key_id: String,
}

impl TokenMinter {
    pub fn new(keys: Arc<SecretKeyProvider>) -> Self {
        Self::with_key_id(keys, DEFAULT_KEY_ID)
    }

    pub fn with_key_id(keys: Arc<SecretKeyProvider>, key_id: impl Into<String>) -> Self {
        Self {
            keys,
            key_id: key_id.into(),
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Mint a token for `tenant_id` valid for `ttl_minutes` from now
    ///
    /// A key fetch failure is returned to the caller; login must fail rather
    /// than hand out an unsigned token.
    pub async fn mint(&self, tenant_id: &str, ttl_minutes: i64) -> Result<MintedToken> {
        self.mint_at(tenant_id, ttl_minutes, Utc::now()).await
    }

    pub async fn mint_at(
        &self,
        tenant_id: &str,
        ttl_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<MintedToken> {
        if ttl_minutes <= 0 {
            return Err(TokenError::InvalidTtl(ttl_minutes));
        }

        let expires_at = Duration::try_minutes(ttl_minutes)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(TokenError::InvalidTtl(ttl_minutes))?
            .timestamp();
        let payload = TenantContextPayload::new(tenant_id, expires_at, self.key_id.as_str());

        let key = self.keys.get_key().await?;
        debug!(tenant_id = %tenant_id, key_id = %self.key_id, "Signing tenant context");
        let token = sign_payload(&payload, &key)?;

        info!(
            tenant_id = %tenant_id,
            expires_at = expires_at,
            "Tenant context token minted"
        );

        Ok(MintedToken { token, expires_at })
    }
}
