use crate::config::EdgeConfig;
use crate::cookie_header::find_cookie;
use crate::tenant::AuthenticatedTenant;
use actix_web::http::StatusCode;
use std::sync::Arc;
use tenant_secrets::SecretKeyProvider;
use tenant_token::{SignedToken, TokenError, TENANT_CTX_COOKIE};
use tracing::{debug, error, warn};

/// Why the edge refused a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The edge event itself was unusable
    InvalidEvent,
    MissingCookie,
    MissingTenantCtx,
    InvalidFormat,
    InvalidSignature,
    Expired,
    /// Key could not be fetched; fail closed
    SecretUnavailable,
}

impl DenyReason {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DenyReason::InvalidEvent => StatusCode::BAD_REQUEST,
            DenyReason::SecretUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn status(&self) -> u16 {
        self.status_code().as_u16()
    }

    pub fn description(&self) -> &'static str {
        match self {
            DenyReason::InvalidEvent => "Invalid Event",
            DenyReason::MissingCookie => "Missing Cookie",
            DenyReason::MissingTenantCtx => "Missing TenantCtx",
            DenyReason::InvalidFormat => "Invalid Format",
            DenyReason::InvalidSignature => "Invalid Signature",
            DenyReason::Expired => "Expired",
            DenyReason::SecretUnavailable => "Service Unavailable",
        }
    }
}

impl From<&TokenError> for DenyReason {
    fn from(err: &TokenError) -> Self {
        match err {
            TokenError::MissingCredential => DenyReason::MissingTenantCtx,
            TokenError::SignatureMismatch => DenyReason::InvalidSignature,
            TokenError::Expired { .. } => DenyReason::Expired,
            TokenError::Secret(_) => DenyReason::SecretUnavailable,
            TokenError::MalformedToken(_)
            | TokenError::Serialization(_)
            | TokenError::InvalidTtl(_)
            | TokenError::InvalidExpiry(_) => DenyReason::InvalidFormat,
        }
    }
}

/// Terminal outcome of one edge verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeDecision {
    Allow(AuthenticatedTenant),
    Deny(DenyReason),
}

impl EdgeDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, EdgeDecision::Allow(_))
    }
}

/// The edge authorization decision
///
/// Holds nothing but the key provider; every call is independent.
pub struct EdgeVerifier {
    keys: Arc<SecretKeyProvider>,
    cookie_name: String,
}

impl EdgeVerifier {
    pub fn new(keys: Arc<SecretKeyProvider>) -> Self {
        Self {
            keys,
            cookie_name: TENANT_CTX_COOKIE.to_string(),
        }
    }

    pub fn with_cookie_name(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = cookie_name.into();
        self
    }

    pub async fn from_config(config: &EdgeConfig) -> anyhow::Result<Self> {
        let keys = SecretKeyProvider::from_config(&config.keys).await?;
        Ok(Self::new(Arc::new(keys)).with_cookie_name(config.cookie_name.clone()))
    }

    pub fn keys(&self) -> &Arc<SecretKeyProvider> {
        &self.keys
    }

    pub async fn decide_now(&self, cookie_header: Option<&str>) -> EdgeDecision {
        self.decide(cookie_header, chrono::Utc::now().timestamp()).await
    }

    /// Decide for one request given its (joined) `Cookie` header and the
    /// verification instant in Unix seconds
    pub async fn decide(&self, cookie_header: Option<&str>, now: i64) -> EdgeDecision {
        match self.verify(cookie_header, now).await {
            Ok(tenant) => {
                debug!(tenant_id = %tenant, "Edge request allowed");
                EdgeDecision::Allow(tenant)
            }
            Err(reason) => {
                warn!(
                    status = reason.status(),
                    reason = reason.description(),
                    "Edge request denied"
                );
                EdgeDecision::Deny(reason)
            }
        }
    }

    async fn verify(
        &self,
        cookie_header: Option<&str>,
        now: i64,
    ) -> Result<AuthenticatedTenant, DenyReason> {
        let cookie_header = cookie_header.ok_or(DenyReason::MissingCookie)?;

        let signed = SignedToken::from_credential(find_cookie(cookie_header, &self.cookie_name))
            .map_err(|e| DenyReason::from(&e))?;

        let key = self.keys.get_key().await.map_err(|e| {
            error!(error = %e, "Signing key unavailable; denying request");
            DenyReason::SecretUnavailable
        })?;

        signed
            .verify_signature(&key)
            .map_err(|e| DenyReason::from(&e))?;

        let payload = signed.decode_payload().map_err(|e| DenyReason::from(&e))?;
        if payload.tenant_id.is_empty() {
            return Err(DenyReason::InvalidFormat);
        }
        if payload.is_expired_at(now) {
            return Err(DenyReason::Expired);
        }

        Ok(AuthenticatedTenant::new(payload.tenant_id))
    }
}
