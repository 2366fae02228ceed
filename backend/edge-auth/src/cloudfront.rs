//! Lambda@Edge viewer-request adapter
//!
//! Event and response shapes follow the CloudFront Lambda@Edge JSON contract:
//! header maps are keyed by lowercase name, each holding `{key, value}` pairs.

use crate::cookie_header::join_cookie_headers;
use crate::tenant::TENANT_ID_HEADER;
use crate::verifier::{DenyReason, EdgeDecision, EdgeVerifier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

const COOKIE_KEY: &str = "cookie";
const TENANT_ID_KEY: &str = "x-tenant-id";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFrontEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<CloudFrontRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFrontRecord {
    pub cf: CloudFrontData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFrontData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
    pub request: CloudFrontRequest,
}

/// Viewer request; everything besides headers passes through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFrontRequest {
    #[serde(default)]
    pub headers: BTreeMap<String, Vec<CloudFrontHeader>>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudFrontHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub value: String,
}

impl CloudFrontHeader {
    pub fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.to_string()),
            value: value.into(),
        }
    }
}

/// Response generated at the edge instead of contacting the origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudFrontResponse {
    pub status: String,
    pub status_description: String,
    pub headers: BTreeMap<String, Vec<CloudFrontHeader>>,
}

impl CloudFrontResponse {
    /// Deny response; never cacheable
    pub fn deny(reason: DenyReason) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(
            "cache-control".to_string(),
            vec![CloudFrontHeader::new("Cache-Control", "no-store")],
        );

        Self {
            status: reason.status().to_string(),
            status_description: reason.description().to_string(),
            headers,
        }
    }
}

/// What the edge function returns to CloudFront
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EdgeResult {
    /// Continue to the origin with this (mutated) request
    Forward(CloudFrontRequest),
    Respond(CloudFrontResponse),
}

impl EdgeVerifier {
    /// Handle a raw event; anything that does not parse is a 400
    pub async fn handle_raw_event(&self, raw: serde_json::Value) -> EdgeResult {
        match serde_json::from_value::<CloudFrontEvent>(raw) {
            Ok(event) => self.handle_event(event).await,
            Err(e) => {
                warn!(error = %e, "Unparseable edge event");
                EdgeResult::Respond(CloudFrontResponse::deny(DenyReason::InvalidEvent))
            }
        }
    }

    pub async fn handle_event(&self, event: CloudFrontEvent) -> EdgeResult {
        let Some(record) = event.records.into_iter().next() else {
            return EdgeResult::Respond(CloudFrontResponse::deny(DenyReason::InvalidEvent));
        };
        let mut request = record.cf.request;

        let cookie_header = request
            .headers
            .get(COOKIE_KEY)
            .and_then(|values| join_cookie_headers(values.iter().map(|h| h.value.as_str())));

        match self.decide_now(cookie_header.as_deref()).await {
            EdgeDecision::Allow(tenant) => {
                // Replaces any client-supplied value
                request.headers.insert(
                    TENANT_ID_KEY.to_string(),
                    vec![CloudFrontHeader::new(TENANT_ID_HEADER, tenant.tenant_id())],
                );
                EdgeResult::Forward(request)
            }
            EdgeDecision::Deny(reason) => EdgeResult::Respond(CloudFrontResponse::deny(reason)),
        }
    }
}
