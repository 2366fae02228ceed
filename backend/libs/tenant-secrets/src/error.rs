use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecretError {
    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Access denied to secret: {0}")]
    AccessDenied(String),

    #[error("Secret decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid secret format: {0}")]
    InvalidFormat(String),

    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    /// The store could not be reached and no fresh key is cached.
    #[error("Signing key unavailable for secret {secret_id}: {source}")]
    Unavailable {
        secret_id: String,
        source: Arc<SecretError>,
    },
}

impl SecretError {
    /// True when the caller has no key to work with at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SecretError::Unavailable { .. })
    }
}
