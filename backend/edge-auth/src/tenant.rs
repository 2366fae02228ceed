use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde_json::json;
use std::fmt;

/// Trusted identity header set by the edge on ALLOW
pub const TENANT_ID_HEADER: &str = "X-Tenant-Id";

/// Tenant identity established by edge verification
///
/// Only this crate can construct one: either from a verified token, or, at an
/// origin that sits behind the edge, from the `X-Tenant-Id` header the edge
/// injected. Handlers take it as an extractor instead of reading raw headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedTenant {
    tenant_id: String,
}

impl AuthenticatedTenant {
    pub(crate) fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }
}

impl fmt::Display for AuthenticatedTenant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tenant_id)
    }
}

/// Extensions first (edge middleware in-process), then the trusted header
impl FromRequest for AuthenticatedTenant {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(tenant) = req.extensions().get::<AuthenticatedTenant>() {
            return ready(Ok(tenant.clone()));
        }

        let header = req
            .headers()
            .get(TENANT_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty());

        match header {
            Some(tenant_id) => ready(Ok(AuthenticatedTenant::new(tenant_id))),
            None => {
                let message = "X-Tenant-Id header is required";
                let response = HttpResponse::BadRequest().json(json!({ "message": message }));
                ready(Err(InternalError::from_response(message, response).into()))
            }
        }
    }
}
