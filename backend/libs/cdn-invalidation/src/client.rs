use crate::error::InvalidationError;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudfront::types::{InvalidationBatch as CloudFrontBatch, Paths};
use aws_sdk_cloudfront::Client as CloudFrontClient;
use serde::Serialize;
use tracing::{debug, info};

/// One invalidation request against a distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidationBatch {
    pub distribution_id: String,
    pub paths: Vec<String>,
    pub caller_reference: String,
}

/// CDN cache-invalidation API
#[async_trait]
pub trait InvalidationClient: Send + Sync {
    /// Submit the batch; returns the CDN's invalidation id when it reports one
    async fn create_invalidation(
        &self,
        batch: &InvalidationBatch,
    ) -> Result<Option<String>, InvalidationError>;
}

/// CloudFront `CreateInvalidation` client
pub struct CloudFrontInvalidationClient {
    client: CloudFrontClient,
}

impl CloudFrontInvalidationClient {
    pub async fn new(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        info!(region = %region, "Initialized CloudFront client");

        Self {
            client: CloudFrontClient::new(&config),
        }
    }

    pub fn from_client(client: CloudFrontClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InvalidationClient for CloudFrontInvalidationClient {
    async fn create_invalidation(
        &self,
        batch: &InvalidationBatch,
    ) -> Result<Option<String>, InvalidationError> {
        let paths = Paths::builder()
            .quantity(batch.paths.len() as i32)
            .set_items(Some(batch.paths.clone()))
            .build()
            .map_err(|e| InvalidationError::Configuration(e.to_string()))?;

        let request = CloudFrontBatch::builder()
            .paths(paths)
            .caller_reference(batch.caller_reference.clone())
            .build()
            .map_err(|e| InvalidationError::Configuration(e.to_string()))?;

        debug!(
            distribution_id = %batch.distribution_id,
            caller_reference = %batch.caller_reference,
            "Submitting CloudFront invalidation"
        );

        let output = self
            .client
            .create_invalidation()
            .distribution_id(batch.distribution_id.clone())
            .invalidation_batch(request)
            .send()
            .await
            .map_err(|e| InvalidationError::Cdn(e.into_service_error().to_string()))?;

        Ok(output.invalidation().map(|inv| inv.id().to_string()))
    }
}
