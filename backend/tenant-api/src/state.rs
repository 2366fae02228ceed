use crate::config::{Settings, DEFAULT_CDN_DOMAIN_SUFFIX};
use crate::services::{
    EmployeeRepository, InMemoryEmployeeRepository, StaticUserDirectory, UserDirectory,
};
use anyhow::{Context, Result};
use cdn_invalidation::{CacheInvalidator, CloudFrontInvalidationClient};
use edge_auth::EdgeVerifier;
use std::sync::Arc;
use tenant_secrets::SecretKeyProvider;
use tenant_token::{TokenMinter, DEFAULT_TOKEN_TTL_MINUTES};

/// Shared per-process state handed to every handler
pub struct AppState {
    pub minter: TokenMinter,
    pub users: Arc<dyn UserDirectory>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub invalidator: Arc<CacheInvalidator>,
    /// Only consulted when `emulate_edge` is set
    pub verifier: Arc<EdgeVerifier>,
    pub token_ttl_minutes: i64,
    pub cdn_domain_suffix: String,
    pub emulate_edge: bool,
}

impl AppState {
    /// Demo users, seeded employees and default token settings
    pub fn new(keys: Arc<SecretKeyProvider>, invalidator: Arc<CacheInvalidator>) -> Self {
        Self {
            minter: TokenMinter::new(keys.clone()),
            users: Arc::new(StaticUserDirectory::demo()),
            employees: Arc::new(InMemoryEmployeeRepository::seeded()),
            invalidator,
            verifier: Arc::new(EdgeVerifier::new(keys)),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            cdn_domain_suffix: DEFAULT_CDN_DOMAIN_SUFFIX.to_string(),
            emulate_edge: false,
        }
    }

    pub fn with_emulated_edge(mut self, enabled: bool) -> Self {
        self.emulate_edge = enabled;
        self
    }

    pub fn with_employees(mut self, employees: Arc<dyn EmployeeRepository>) -> Self {
        self.employees = employees;
        self
    }

    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let keys = Arc::new(
            SecretKeyProvider::from_config(&settings.keys)
                .await
                .context("Failed to initialise signing key provider")?,
        );

        let invalidator_config = settings.cdn.invalidator_config();
        let invalidator = if invalidator_config.enabled {
            let client = CloudFrontInvalidationClient::new(&settings.cdn.region).await;
            CacheInvalidator::new(Arc::new(client), invalidator_config)
        } else {
            CacheInvalidator::disabled()
        };

        let mut state = Self::new(keys.clone(), Arc::new(invalidator))
            .with_emulated_edge(settings.server.emulate_edge);
        state.minter = TokenMinter::with_key_id(keys, settings.token.key_id.clone());
        state.token_ttl_minutes = settings.token.ttl_minutes;
        state.cdn_domain_suffix = settings.cdn.domain_suffix.clone();
        Ok(state)
    }
}
