//! CacheInvalidator against a recording client
//!
//! Verifies the submitted batch and that a failing CDN never surfaces to the caller.

use async_trait::async_trait;
use cdn_invalidation::{
    CacheInvalidator, InvalidationBatch, InvalidationClient, InvalidationError,
    InvalidationOutcome, InvalidatorConfig,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingClient {
    batches: Mutex<Vec<InvalidationBatch>>,
    fail: bool,
}

#[async_trait]
impl InvalidationClient for RecordingClient {
    async fn create_invalidation(
        &self,
        batch: &InvalidationBatch,
    ) -> Result<Option<String>, InvalidationError> {
        self.batches.lock().unwrap().push(batch.clone());
        if self.fail {
            Err(InvalidationError::Cdn("AccessDenied".to_string()))
        } else {
            Ok(Some("I2J0I21PCUYOIK".to_string()))
        }
    }
}

fn invalidator(client: Arc<RecordingClient>) -> Arc<CacheInvalidator> {
    Arc::new(CacheInvalidator::new(
        client,
        InvalidatorConfig::new("E1X7R3DVK2IL9", "/api/employee"),
    ))
}

#[tokio::test]
async fn test_invalidation_submits_exactly_two_paths() {
    let client = Arc::new(RecordingClient::default());
    let invalidator = invalidator(client.clone());

    let outcome = invalidator.notify("42", "tenant-customer2").await.unwrap();
    assert!(outcome.is_submitted());

    let batches = client.batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].paths,
        vec![
            "/api/employee/tenant-customer2/42".to_string(),
            "/api/employee/tenant-customer2*".to_string(),
        ]
    );
    assert_eq!(invalidator.stats().submitted, 1);
}

#[tokio::test]
async fn test_rapid_calls_use_distinct_caller_references() {
    let client = Arc::new(RecordingClient::default());
    let invalidator = invalidator(client.clone());

    for _ in 0..5 {
        invalidator.invalidate("42", "tenant-customer2").await;
    }

    let batches = client.batches.lock().unwrap();
    let mut refs: Vec<_> = batches.iter().map(|b| b.caller_reference.clone()).collect();
    refs.sort();
    refs.dedup();
    assert_eq!(refs.len(), 5);
}

#[tokio::test]
async fn test_failing_cdn_is_contained() {
    let client = Arc::new(RecordingClient {
        fail: true,
        ..Default::default()
    });
    let invalidator = invalidator(client.clone());

    let handle = invalidator.notify("42", "tenant-customer2");
    let outcome = handle.await.expect("dispatch task must not panic");

    assert!(matches!(outcome, InvalidationOutcome::Failed { .. }));
    assert_eq!(invalidator.stats().failed, 1);
    assert_eq!(client.batches.lock().unwrap().len(), 1, "no retry");
}
