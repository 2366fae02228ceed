//! Cache behaviour of SecretKeyProvider against a counting in-memory store
//!
//! Covers:
//! 1. One store fetch per TTL window
//! 2. Refetch after the TTL elapses
//! 3. Concurrent cold callers share one fetch
//! 4. Fail-closed when a refresh fails after expiry

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tenant_secrets::{SecretError, SecretKeyProvider, SecretStore};
use tokio::time::sleep;

struct CountingStore {
    calls: AtomicUsize,
    failing: AtomicBool,
    delay: Duration,
}

impl CountingStore {
    fn new() -> Arc<Self> {
        Self::with_delay(Duration::ZERO)
    }

    fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            delay,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for CountingStore {
    async fn fetch_secret_string(&self, secret_id: &str) -> Result<String, SecretError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(SecretError::AwsSdk(format!("{} unreachable", secret_id)));
        }
        Ok(r#"{"tenantctx_hmac_key": "c2lnbmluZy1rZXk="}"#.to_string())
    }
}

fn provider(store: Arc<CountingStore>, ttl: Option<Duration>) -> SecretKeyProvider {
    SecretKeyProvider::builder(store)
        .secret_id("test/tenantctx")
        .ttl(ttl)
        .build()
}

#[tokio::test]
async fn test_two_reads_within_ttl_issue_one_fetch() {
    let store = CountingStore::new();
    let provider = provider(store.clone(), Some(Duration::from_secs(600)));

    let first = provider.get_key().await.unwrap();
    let second = provider.get_key().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.as_bytes(), b"signing-key");
    assert_eq!(store.calls(), 1, "second read should be served from cache");
    assert_eq!(provider.fetch_count(), 1);
}

#[tokio::test]
async fn test_read_after_ttl_refetches() {
    let store = CountingStore::new();
    let provider = provider(store.clone(), Some(Duration::from_millis(50)));

    provider.get_key().await.unwrap();
    sleep(Duration::from_millis(150)).await;
    provider.get_key().await.unwrap();

    assert_eq!(store.calls(), 2, "expired key must trigger a new fetch");
}

#[tokio::test]
async fn test_no_ttl_fetches_once() {
    let store = CountingStore::new();
    let provider = provider(store.clone(), None);

    for _ in 0..5 {
        provider.get_key().await.unwrap();
    }
    sleep(Duration::from_millis(50)).await;
    provider.get_key().await.unwrap();

    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_concurrent_cold_reads_coalesce() {
    let store = CountingStore::with_delay(Duration::from_millis(50));
    let provider = Arc::new(provider(store.clone(), Some(Duration::from_secs(600))));

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let provider = provider.clone();
            tokio::spawn(async move { provider.get_key().await })
        })
        .collect();

    let keys = futures_util::future::join_all(tasks).await;
    for key in keys {
        assert_eq!(key.unwrap().unwrap().as_bytes(), b"signing-key");
    }
    assert_eq!(store.calls(), 1, "concurrent refreshes should share one fetch");
}

#[tokio::test]
async fn test_failed_refresh_after_expiry_fails_closed() {
    let store = CountingStore::new();
    let provider = provider(store.clone(), Some(Duration::from_millis(50)));

    provider.get_key().await.unwrap();
    store.failing.store(true, Ordering::SeqCst);
    sleep(Duration::from_millis(150)).await;

    let err = provider.get_key().await.unwrap_err();
    assert!(err.is_unavailable(), "stale key must not be served: {err}");

    store.failing.store(false, Ordering::SeqCst);
    assert!(provider.get_key().await.is_ok(), "recovers on next successful fetch");
}
