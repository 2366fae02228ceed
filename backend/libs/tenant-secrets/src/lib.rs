//! Signing key provisioning for tenant-context tokens
//!
//! This library supplies the symmetric HMAC key used to mint tokens at the
//! origin and to verify them at the CDN edge:
//! - Fetches the key record from AWS Secrets Manager (or a static development key)
//! - Caches it per provider instance with a configurable TTL
//! - Coalesces concurrent refreshes into a single in-flight fetch
//! - Fails closed: an expired key is never served after a failed refresh
//!
//! Every runtime context owns its own [`SecretKeyProvider`]; nothing here is global.
//!
//! # Example
//!
//! ```no_run
//! use tenant_secrets::{KeyProviderConfig, SecretKeyProvider};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = KeyProviderConfig::from_env()?;
//!     let provider = SecretKeyProvider::from_config(&config).await?;
//!
//!     let key = provider.get_key().await?;
//!     assert!(!key.as_bytes().is_empty());
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod key;
mod provider;
mod store;

pub use config::{
    KeyProviderConfig, KeySource, DEFAULT_DEV_KEY_B64, DEFAULT_SECRET_KEY_FIELD,
    DEFAULT_SECRET_REGION, EDGE_KEY_TTL,
};
pub use error::SecretError;
pub use key::{parse_key_record, SecretMaterial, SigningKey};
pub use provider::{SecretKeyProvider, SecretKeyProviderBuilder};
pub use store::{AwsSecretStore, SecretStore, StaticKeyStore};
