use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Field of the secret record holding the base64 HMAC key
pub const DEFAULT_SECRET_KEY_FIELD: &str = "tenantctx_hmac_key";
pub const DEFAULT_SECRET_REGION: &str = "us-east-2";
/// Decodes to `test-hmac-key-for-development-only`
pub const DEFAULT_DEV_KEY_B64: &str = "dGVzdC1obWFjLWtleS1mb3ItZGV2ZWxvcG1lbnQtb25seQ==";
/// Key cache lifetime inside an edge execution environment
pub const EDGE_KEY_TTL: Duration = Duration::from_secs(10 * 60);

/// Where the signing key comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    SecretsManager { secret_id: String, region: String },
    /// Non-production only
    Static { key_base64: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyProviderConfig {
    pub source: KeySource,
    pub key_field: String,
    pub ttl: Option<Duration>,
}

impl KeyProviderConfig {
    /// Development defaults: static key, cached forever
    pub fn development() -> Self {
        Self {
            source: KeySource::Static {
                key_base64: DEFAULT_DEV_KEY_B64.to_string(),
            },
            key_field: DEFAULT_SECRET_KEY_FIELD.to_string(),
            ttl: None,
        }
    }

    pub fn secrets_manager(secret_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            source: KeySource::SecretsManager {
                secret_id: secret_id.into(),
                region: region.into(),
            },
            key_field: DEFAULT_SECRET_KEY_FIELD.to_string(),
            ttl: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Load from environment variables
    ///
    /// - `APP_ENV=production` selects Secrets Manager and requires `TENANTCTX_SECRET_ID`
    /// - `TENANTCTX_SECRET_REGION` (default `us-east-2`)
    /// - `TENANTCTX_SECRET_KEY_NAME` (default `tenantctx_hmac_key`)
    /// - `TENANTCTX_KEY_TTL_SECS` (unset: fetch once, keep forever)
    /// - `TENANTCTX_DEV_KEY` base64 key used outside production
    pub fn from_env() -> Result<Self> {
        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let source = if production {
            KeySource::SecretsManager {
                secret_id: env::var("TENANTCTX_SECRET_ID")
                    .context("TENANTCTX_SECRET_ID must be set in production")?,
                region: env::var("TENANTCTX_SECRET_REGION")
                    .unwrap_or_else(|_| DEFAULT_SECRET_REGION.to_string()),
            }
        } else {
            KeySource::Static {
                key_base64: env::var("TENANTCTX_DEV_KEY")
                    .unwrap_or_else(|_| DEFAULT_DEV_KEY_B64.to_string()),
            }
        };

        let ttl = match env::var("TENANTCTX_KEY_TTL_SECS") {
            Ok(raw) => Some(Duration::from_secs(
                raw.parse().context("Invalid TENANTCTX_KEY_TTL_SECS")?,
            )),
            Err(_) => None,
        };

        Ok(Self {
            source,
            key_field: env::var("TENANTCTX_SECRET_KEY_NAME")
                .unwrap_or_else(|_| DEFAULT_SECRET_KEY_FIELD.to_string()),
            ttl,
        })
    }

    pub fn is_production(&self) -> bool {
        matches!(self.source, KeySource::SecretsManager { .. })
    }
}
