//! # Edge Authorization
//!
//! Per-request tenant verification at the CDN edge.
//!
//! Every request carrying a `TenantCtx` cookie is checked before it reaches
//! the origin: token shape, HMAC signature (constant-time), then expiry. On
//! success the request is forwarded with a trusted `X-Tenant-Id` header; on
//! failure the edge answers itself with `Cache-Control: no-store`.
//!
//! ## Deployment invariant
//!
//! The origin does not re-verify signatures. It trusts `X-Tenant-Id` because
//! it must only be reachable through the CDN. An origin reachable directly
//! is a full tenant-isolation bypass.
//!
//! ## Modules
//! - `verifier`: the decision state machine
//! - `tenant`: `AuthenticatedTenant`, the only way handlers learn the tenant
//! - `cloudfront`: Lambda@Edge viewer-request event adapter
//! - `middleware`: actix-web adapter for edge proxies and local runs

pub mod cloudfront;
pub mod config;
pub mod cookie_header;
pub mod middleware;
pub mod tenant;
pub mod verifier;

pub use cloudfront::{
    CloudFrontEvent, CloudFrontHeader, CloudFrontRequest, CloudFrontResponse, EdgeResult,
};
pub use config::EdgeConfig;
pub use middleware::TenantCtxMiddleware;
pub use tenant::{AuthenticatedTenant, TENANT_ID_HEADER};
pub use verifier::{DenyReason, EdgeDecision, EdgeVerifier};
