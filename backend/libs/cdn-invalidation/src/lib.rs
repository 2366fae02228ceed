//! CDN cache invalidation for tenant-scoped mutations
//!
//! After the origin changes one tenant's data, the cached copies at the CDN
//! edge are purged so the next request is recomputed.
//!
//! # Flow
//!
//! ```text
//! tenant-api (origin):
//!   1. Update employee 42 of tenant-customer2
//!   2. CacheInvalidator::notify(42, tenant-customer2)   <- returns immediately
//!   3. Respond 200 to the caller
//!        ↓ (background task)
//! CloudFront CreateInvalidation:
//!   paths = [/api/employee/tenant-customer2/42, /api/employee/tenant-customer2*]
//!   caller_reference = update-42-<millis>-<uuid>
//! ```
//!
//! Invalidation is best-effort: one attempt, no retry, no queue. A failure is
//! logged and counted; a stale window until the CDN TTL runs out is accepted.
//!
//! # Example
//!
//! ```no_run
//! use cdn_invalidation::{CacheInvalidator, CloudFrontInvalidationClient, InvalidatorConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = CloudFrontInvalidationClient::new("us-east-1").await;
//!     let invalidator = Arc::new(CacheInvalidator::new(
//!         Arc::new(client),
//!         InvalidatorConfig::new("E1X7R3DVK2IL9", "/api/employee"),
//!     ));
//!
//!     // Fire and forget
//!     let _ = invalidator.notify("42", "tenant-customer2");
//! }
//! ```

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{info, warn};

mod client;
mod error;
mod paths;
mod stats;

pub use client::{CloudFrontInvalidationClient, InvalidationBatch, InvalidationClient};
pub use error::InvalidationError;
pub use paths::{caller_reference, tenant_paths};
pub use stats::{InvalidationStats, StatsCollector};

pub const DEFAULT_PATH_PREFIX: &str = "/api/employee";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidatorConfig {
    pub distribution_id: String,
    pub path_prefix: String,
    /// When false every call is skipped (local development without a CDN)
    pub enabled: bool,
}

impl InvalidatorConfig {
    pub fn new(distribution_id: impl Into<String>, path_prefix: impl Into<String>) -> Self {
        Self {
            distribution_id: distribution_id.into(),
            path_prefix: path_prefix.into(),
            enabled: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            distribution_id: String::new(),
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            enabled: false,
        }
    }
}

/// Result of one best-effort invalidation. Callers may ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvalidationOutcome {
    Submitted {
        caller_reference: String,
        invalidation_id: Option<String>,
    },
    Failed {
        caller_reference: String,
        error: String,
    },
    Disabled,
}

impl InvalidationOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, InvalidationOutcome::Submitted { .. })
    }
}

struct NoopClient;

#[async_trait::async_trait]
impl InvalidationClient for NoopClient {
    async fn create_invalidation(
        &self,
        _batch: &InvalidationBatch,
    ) -> Result<Option<String>, InvalidationError> {
        Ok(None)
    }
}

/// Purges tenant-scoped CDN paths after origin mutations
pub struct CacheInvalidator {
    client: Arc<dyn InvalidationClient>,
    config: InvalidatorConfig,
    stats: StatsCollector,
}

impl CacheInvalidator {
    pub fn new(client: Arc<dyn InvalidationClient>, config: InvalidatorConfig) -> Self {
        Self {
            client,
            config,
            stats: StatsCollector::new(),
        }
    }

    /// Invalidator that skips every call (no CDN configured)
    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopClient), InvalidatorConfig::disabled())
    }

    /// Batch covering the single resource and the tenant-wide wildcard
    pub fn batch_for(&self, resource_id: &str, tenant_id: &str) -> InvalidationBatch {
        InvalidationBatch {
            distribution_id: self.config.distribution_id.clone(),
            paths: tenant_paths(&self.config.path_prefix, tenant_id, resource_id),
            caller_reference: caller_reference(resource_id),
        }
    }

    /// Submit one invalidation and report the outcome. Never returns an error.
    pub async fn invalidate(&self, resource_id: &str, tenant_id: &str) -> InvalidationOutcome {
        if !self.config.enabled {
            self.stats.record_skipped();
            return InvalidationOutcome::Disabled;
        }

        let batch = self.batch_for(resource_id, tenant_id);
        let started = Instant::now();

        match self.client.create_invalidation(&batch).await {
            Ok(invalidation_id) => {
                self.stats.record_submitted();
                info!(
                    tenant_id = %tenant_id,
                    resource_id = %resource_id,
                    caller_reference = %batch.caller_reference,
                    invalidation_id = ?invalidation_id,
                    latency_ms = started.elapsed().as_millis() as u64,
                    "CDN invalidation submitted"
                );
                InvalidationOutcome::Submitted {
                    caller_reference: batch.caller_reference,
                    invalidation_id,
                }
            }
            Err(e) => {
                self.stats.record_failed();
                warn!(
                    tenant_id = %tenant_id,
                    resource_id = %resource_id,
                    caller_reference = %batch.caller_reference,
                    error = %e,
                    "CDN invalidation failed; cached paths stay stale until TTL"
                );
                InvalidationOutcome::Failed {
                    caller_reference: batch.caller_reference,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Dispatch [`invalidate`](Self::invalidate) onto the runtime and return at once
    ///
    /// Dropping the handle does not cancel the task.
    pub fn notify(self: &Arc<Self>, resource_id: &str, tenant_id: &str) -> JoinHandle<InvalidationOutcome> {
        let this = Arc::clone(self);
        let resource_id = resource_id.to_string();
        let tenant_id = tenant_id.to_string();

        tokio::spawn(async move { this.invalidate(&resource_id, &tenant_id).await })
    }

    pub fn stats(&self) -> InvalidationStats {
        self.stats.snapshot()
    }

    pub fn config(&self) -> &InvalidatorConfig {
        &self.config
    }
}
