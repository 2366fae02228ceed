use anyhow::Result;
use tenant_secrets::{KeyProviderConfig, DEFAULT_SECRET_REGION, EDGE_KEY_TTL};
use tenant_token::TENANT_CTX_COOKIE;

/// Edge verifier settings
///
/// Edge runtimes have no environment of their own, so production values are
/// normally compiled in via [`EdgeConfig::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeConfig {
    pub keys: KeyProviderConfig,
    pub cookie_name: String,
}

impl EdgeConfig {
    /// Secrets Manager key in the default region, cached for 10 minutes
    pub fn new(secret_id: impl Into<String>) -> Self {
        Self {
            keys: KeyProviderConfig::secrets_manager(secret_id, DEFAULT_SECRET_REGION)
                .with_ttl(Some(EDGE_KEY_TTL)),
            cookie_name: TENANT_CTX_COOKIE.to_string(),
        }
    }

    pub fn development() -> Self {
        Self {
            keys: KeyProviderConfig::development().with_ttl(Some(EDGE_KEY_TTL)),
            cookie_name: TENANT_CTX_COOKIE.to_string(),
        }
    }

    /// Same variables as the origin; the key TTL defaults to 10 minutes
    pub fn from_env() -> Result<Self> {
        let mut keys = KeyProviderConfig::from_env()?;
        if keys.ttl.is_none() {
            keys.ttl = Some(EDGE_KEY_TTL);
        }

        Ok(Self {
            keys,
            cookie_name: TENANT_CTX_COOKIE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenant_secrets::KeySource;

    #[test]
    fn test_edge_config_uses_ten_minute_ttl() {
        let config = EdgeConfig::new("prod/tenantctx");
        assert_eq!(config.keys.ttl, Some(EDGE_KEY_TTL));
        assert_eq!(config.cookie_name, "TenantCtx");
        assert_eq!(
            config.keys.source,
            KeySource::SecretsManager {
                secret_id: "prod/tenantctx".to_string(),
                region: "us-east-2".to_string(),
            }
        );
    }
}
