use tenant_secrets::SecretError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TokenError>;

#[derive(Debug, Error)]
pub enum TokenError {
    /// No cookie or no token value
    #[error("Missing credential")]
    MissingCredential,

    /// Wrong segment count, bad base64 or bad JSON
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Signature mismatch")]
    SignatureMismatch,

    #[error("Token expired at {expired_at}")]
    Expired { expired_at: i64 },

    #[error("Invalid token TTL: {0} minutes")]
    InvalidTtl(i64),

    #[error("Invalid cookie expiry: {0}")]
    InvalidExpiry(i64),

    #[error("Signing key error: {0}")]
    Secret(#[from] SecretError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
