use crate::cookie_header::join_cookie_headers;
use crate::tenant::TENANT_ID_HEADER;
use crate::verifier::{DenyReason, EdgeDecision, EdgeVerifier};
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderName, HeaderValue},
    Error, HttpMessage, HttpResponse,
};
use futures::future::{ready, Ready};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Serialize)]
struct DenyBody {
    error: &'static str,
    code: u16,
}

/// Edge verification as actix-web middleware
///
/// Strips any incoming `X-Tenant-Id`, runs [`EdgeVerifier`], and on ALLOW
/// re-inserts the verified header plus an [`AuthenticatedTenant`](crate::AuthenticatedTenant)
/// request extension.
pub struct TenantCtxMiddleware {
    verifier: Arc<EdgeVerifier>,
}

impl TenantCtxMiddleware {
    pub fn new(verifier: Arc<EdgeVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TenantCtxMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = TenantCtxMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TenantCtxMiddlewareService {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

pub struct TenantCtxMiddlewareService<S> {
    service: Rc<S>,
    verifier: Arc<EdgeVerifier>,
}

impl<S, B> Service<ServiceRequest> for TenantCtxMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let verifier = self.verifier.clone();

        Box::pin(async move {
            // Never let a client-supplied identity through
            req.headers_mut().remove(TENANT_ID_HEADER);

            let cookie_header = join_cookie_headers(
                req.headers()
                    .get_all(header::COOKIE)
                    .filter_map(|v| v.to_str().ok()),
            );

            let tenant = match verifier.decide_now(cookie_header.as_deref()).await {
                EdgeDecision::Allow(tenant) => tenant,
                EdgeDecision::Deny(reason) => {
                    return Ok(req.into_response(deny_response(reason)).map_into_right_body());
                }
            };

            let Ok(value) = HeaderValue::from_str(tenant.tenant_id()) else {
                tracing::warn!("Verified tenant id is not a valid header value");
                return Ok(req
                    .into_response(deny_response(DenyReason::InvalidFormat))
                    .map_into_right_body());
            };

            req.headers_mut()
                .insert(HeaderName::from_static("x-tenant-id"), value);
            req.extensions_mut().insert(tenant);

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Deny response; never cacheable
pub fn deny_response(reason: DenyReason) -> HttpResponse {
    HttpResponse::build(reason.status_code())
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(DenyBody {
            error: reason.description(),
            code: reason.status(),
        })
}
