use crate::error::{Result, TokenError};
use actix_web::cookie::time::OffsetDateTime;
use actix_web::cookie::{Cookie, SameSite};

pub const TENANT_CTX_COOKIE: &str = "TenantCtx";

/// Cookie domain scoping, computed per request from the serving host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieScopePolicy {
    pub domain: Option<String>,
}

impl CookieScopePolicy {
    /// Scope the cookie to `host` only when it belongs to the CDN domain
    ///
    /// ```
    /// use tenant_token::CookieScopePolicy;
    ///
    /// let policy = CookieScopePolicy::for_host("d111.cloudfront.net:443", ".cloudfront.net");
    /// assert_eq!(policy.domain.as_deref(), Some("d111.cloudfront.net"));
    ///
    /// let policy = CookieScopePolicy::for_host("localhost:5100", ".cloudfront.net");
    /// assert_eq!(policy.domain, None);
    /// ```
    pub fn for_host(host: &str, cdn_domain_suffix: &str) -> Self {
        let host = strip_port(host.trim()).to_ascii_lowercase();
        // Compare on a label boundary whether or not the suffix has its dot
        let apex = cdn_domain_suffix
            .trim()
            .trim_start_matches('.')
            .to_ascii_lowercase();

        let matches =
            !apex.is_empty() && (host == apex || host.ends_with(&format!(".{apex}")));

        Self {
            domain: matches.then_some(host),
        }
    }
}

fn strip_port(host: &str) -> &str {
    // IPv6 literals keep their brackets; they never match a CDN suffix anyway
    if host.starts_with('[') {
        return host;
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

/// `TenantCtx` cookie carrying a freshly minted token
pub fn session_cookie(
    token: &str,
    expires_at: i64,
    policy: &CookieScopePolicy,
) -> Result<Cookie<'static>> {
    let expires = OffsetDateTime::from_unix_timestamp(expires_at)
        .map_err(|_| TokenError::InvalidExpiry(expires_at))?;

    let mut cookie = base_cookie(token.to_string(), policy);
    cookie.set_expires(expires);
    Ok(cookie)
}

/// Cookie that clears `TenantCtx` for the same name/path/domain
pub fn removal_cookie(policy: &CookieScopePolicy) -> Cookie<'static> {
    let mut cookie = base_cookie(String::new(), policy);
    cookie.make_removal();
    cookie
}

fn base_cookie(value: String, policy: &CookieScopePolicy) -> Cookie<'static> {
    let mut cookie = Cookie::new(TENANT_CTX_COOKIE, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::None);
    if let Some(domain) = &policy.domain {
        cookie.set_domain(domain.clone());
    }
    cookie
}
