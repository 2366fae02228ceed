//! Login and logout: the only endpoints that touch the TenantCtx cookie
use crate::error::{AppError, Result};
use crate::models::{LoginRequest, LoginResponse};
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use tenant_token::{removal_cookie, session_cookie, CookieScopePolicy};
use tracing::{info, warn};

pub async fn login(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let Some(user) = state.users.authenticate(&req.email, &req.password) else {
        warn!(email = %req.email, "Login rejected");
        return Err(AppError::InvalidCredentials);
    };

    let minted = state
        .minter
        .mint(&user.tenant_id, state.token_ttl_minutes)
        .await?;

    let policy = CookieScopePolicy::for_host(
        http_req.connection_info().host(),
        &state.cdn_domain_suffix,
    );
    let cookie = session_cookie(&minted.token, minted.expires_at, &policy)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    info!(
        email = %user.email,
        tenant_id = %user.tenant_id,
        cookie_domain = ?policy.domain,
        "Login successful"
    );

    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        email: user.email,
        tenant_id: user.tenant_id,
        message: "Login successful".to_string(),
    }))
}

pub async fn logout(state: web::Data<AppState>, http_req: HttpRequest) -> HttpResponse {
    let policy = CookieScopePolicy::for_host(
        http_req.connection_info().host(),
        &state.cdn_domain_suffix,
    );

    HttpResponse::Ok()
        .cookie(removal_cookie(&policy))
        .json(serde_json::json!({ "message": "Logged out" }))
}
