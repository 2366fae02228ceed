use crate::config::{KeyProviderConfig, KeySource, DEFAULT_SECRET_KEY_FIELD};
use crate::error::SecretError;
use crate::key::{parse_key_record, SecretMaterial, SigningKey};
use crate::store::{AwsSecretStore, SecretStore, StaticKeyStore};
use chrono::Utc;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEV_SECRET_ID: &str = "tenantctx-development";

/// Signing key provider with a per-instance TTL cache
///
/// The cache holds at most one [`SecretMaterial`] per secret id. Concurrent
/// callers that find the cache empty share a single store fetch; the result
/// is inserted as one `Arc` so readers never see a partially written key.
pub struct SecretKeyProvider {
    store: Arc<dyn SecretStore>,
    secret_id: String,
    key_field: String,
    ttl: Option<Duration>,
    cache: Cache<String, Arc<SecretMaterial>>,
    fetches: AtomicU64,
}

impl SecretKeyProvider {
    pub fn builder(store: Arc<dyn SecretStore>) -> SecretKeyProviderBuilder {
        SecretKeyProviderBuilder::new(store)
    }

    /// Build a provider from configuration
    ///
    /// Production configs talk to Secrets Manager; development configs serve
    /// the static key so local runs stay deterministic.
    pub async fn from_config(config: &KeyProviderConfig) -> anyhow::Result<Self> {
        let builder = match &config.source {
            KeySource::SecretsManager { secret_id, region } => {
                let store = AwsSecretStore::new(region).await;
                Self::builder(Arc::new(store)).secret_id(secret_id.clone())
            }
            KeySource::Static { key_base64 } => {
                warn!("Using static development signing key; do not run this in production");
                let store = StaticKeyStore::from_base64_key(&config.key_field, key_base64);
                Self::builder(Arc::new(store)).secret_id(DEV_SECRET_ID)
            }
        };

        Ok(builder
            .key_field(config.key_field.clone())
            .ttl(config.ttl)
            .build())
    }

    /// Return the current signing key, fetching it if the cached copy is
    /// missing or older than the TTL.
    ///
    /// A failed fetch is surfaced as [`SecretError::Unavailable`]; the expired
    /// key is not served in its place.
    pub async fn get_key(&self) -> Result<SigningKey, SecretError> {
        if let Some(material) = self.cache.get(&self.secret_id).await {
            debug!(
                secret_id = %self.secret_id,
                fetched_at = %material.fetched_at,
                "Signing key served from cache"
            );
            return Ok(material.key.clone());
        }

        self.cache
            .try_get_with(self.secret_id.clone(), self.fetch_material())
            .await
            .map(|material| material.key.clone())
            .map_err(|source| {
                warn!(
                    secret_id = %self.secret_id,
                    error = %source,
                    "Signing key refresh failed"
                );
                SecretError::Unavailable {
                    secret_id: self.secret_id.clone(),
                    source,
                }
            })
    }

    /// Snapshot of the cached material, if any is still fresh
    pub async fn cached_material(&self) -> Option<Arc<SecretMaterial>> {
        self.cache.get(&self.secret_id).await
    }

    /// Drop the cached key so the next caller refetches (manual rotation)
    pub async fn invalidate(&self) {
        self.cache.invalidate(&self.secret_id).await;
        info!(secret_id = %self.secret_id, "Signing key cache invalidated");
    }

    /// Number of store fetches issued by this provider
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    async fn fetch_material(&self) -> Result<Arc<SecretMaterial>, SecretError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);

        let record = self.store.fetch_secret_string(&self.secret_id).await?;
        let key = parse_key_record(&record, &self.key_field)?;

        let material = Arc::new(SecretMaterial {
            key,
            fetched_at: Utc::now(),
            ttl: self.ttl,
        });

        info!(
            secret_id = %self.secret_id,
            key_len = material.key.len(),
            ttl = ?self.ttl,
            "Signing key fetched and cached"
        );

        Ok(material)
    }
}

/// Builder for [`SecretKeyProvider`]
pub struct SecretKeyProviderBuilder {
    store: Arc<dyn SecretStore>,
    secret_id: String,
    key_field: String,
    ttl: Option<Duration>,
}

impl SecretKeyProviderBuilder {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            store,
            secret_id: DEV_SECRET_ID.to_string(),
            key_field: DEFAULT_SECRET_KEY_FIELD.to_string(),
            ttl: None,
        }
    }

    pub fn secret_id(mut self, secret_id: impl Into<String>) -> Self {
        self.secret_id = secret_id.into();
        self
    }

    pub fn key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = key_field.into();
        self
    }

    /// `None` caches the first fetched key for the provider's lifetime
    pub fn ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn build(self) -> SecretKeyProvider {
        let mut cache = Cache::builder().max_capacity(1);
        if let Some(ttl) = self.ttl {
            cache = cache.time_to_live(ttl);
        }

        SecretKeyProvider {
            store: self.store,
            secret_id: self.secret_id,
            key_field: self.key_field,
            ttl: self.ttl,
            cache: cache.build(),
            fetches: AtomicU64::new(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FailingStore;

    #[async_trait]
    impl SecretStore for FailingStore {
        async fn fetch_secret_string(&self, secret_id: &str) -> Result<String, SecretError> {
            Err(SecretError::AccessDenied(secret_id.to_string()))
        }
    }

    #[tokio::test]
    async fn test_static_store_provider() {
        let store = StaticKeyStore::from_base64_key(DEFAULT_SECRET_KEY_FIELD, "a2V5");
        let provider = SecretKeyProvider::builder(Arc::new(store)).build();

        let key = provider.get_key().await.unwrap();
        assert_eq!(key.as_bytes(), b"key");
        assert_eq!(provider.fetch_count(), 1);
        assert!(provider.cached_material().await.is_some());
    }

    #[tokio::test]
    async fn test_failed_fetch_without_cache_is_unavailable() {
        let provider = SecretKeyProvider::builder(Arc::new(FailingStore))
            .secret_id("prod/tenantctx")
            .build();

        let err = provider.get_key().await.unwrap_err();
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("prod/tenantctx"));
        assert!(provider.cached_material().await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_record_is_not_cached() {
        let store = StaticKeyStore::new(r#"{"wrong_field": "a2V5"}"#);
        let provider = SecretKeyProvider::builder(Arc::new(store)).build();

        assert!(provider.get_key().await.is_err());
        assert!(provider.get_key().await.is_err());
        assert_eq!(provider.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let store = StaticKeyStore::from_base64_key(DEFAULT_SECRET_KEY_FIELD, "a2V5");
        let provider = SecretKeyProvider::builder(Arc::new(store)).build();

        provider.get_key().await.unwrap();
        provider.invalidate().await;
        provider.get_key().await.unwrap();

        assert_eq!(provider.fetch_count(), 2);
    }
}
