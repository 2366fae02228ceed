//! Configuration for the tenant API origin
//!
//! Every section is read from environment variables. A `.env` file is
//! honoured in debug builds.
//!
//! ```no_run
//! use tenant_api::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     println!("listening on {}:{}", settings.server.host, settings.server.port);
//!     Ok(())
//! }
//! ```

use anyhow::{Context, Result};
use cdn_invalidation::{InvalidatorConfig, DEFAULT_PATH_PREFIX};
use std::env;
use tenant_secrets::KeyProviderConfig;
use tenant_token::{DEFAULT_KEY_ID, DEFAULT_TOKEN_TTL_MINUTES, MAX_TOKEN_TTL_MINUTES};
use tracing::info;

pub const DEFAULT_PORT: u16 = 5100;
pub const DEFAULT_CDN_DOMAIN_SUFFIX: &str = ".cloudfront.net";
pub const DEFAULT_CDN_REGION: &str = "us-east-1";

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub keys: KeyProviderConfig,
    pub token: TokenSettings,
    pub cdn: CdnSettings,
}

impl Settings {
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
            info!("Loaded .env file for development");
        }

        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerSettings::from_env()?,
            keys: KeyProviderConfig::from_env().context("Invalid signing key configuration")?,
            token: TokenSettings::from_env()?,
            cdn: CdnSettings::from_env()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Run the tenant-context check in-process instead of trusting an edge
    pub emulate_edge: bool,
    pub cors_allowed_origins: Vec<String>,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .context("Invalid PORT")?,
            emulate_edge: parse_flag("EMULATE_EDGE")?.unwrap_or(false),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:4101,http://localhost:3000".to_string())
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub ttl_minutes: i64,
    pub key_id: String,
}

impl TokenSettings {
    fn from_env() -> Result<Self> {
        let ttl_minutes: i64 = env::var("TENANTCTX_TOKEN_TTL_MINUTES")
            .unwrap_or_else(|_| DEFAULT_TOKEN_TTL_MINUTES.to_string())
            .parse()
            .context("Invalid TENANTCTX_TOKEN_TTL_MINUTES")?;

        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&ttl_minutes) {
            anyhow::bail!(
                "TENANTCTX_TOKEN_TTL_MINUTES must be within 1..={MAX_TOKEN_TTL_MINUTES}, got {ttl_minutes}"
            );
        }

        Ok(Self {
            ttl_minutes,
            key_id: env::var("TENANTCTX_KEY_ID").unwrap_or_else(|_| DEFAULT_KEY_ID.to_string()),
        })
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            key_id: DEFAULT_KEY_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CdnSettings {
    pub domain_suffix: String,
    pub distribution_id: Option<String>,
    pub region: String,
    pub path_prefix: String,
    pub invalidation_enabled: bool,
}

impl CdnSettings {
    fn from_env() -> Result<Self> {
        let distribution_id = env::var("CDN_DISTRIBUTION_ID")
            .ok()
            .filter(|id| !id.trim().is_empty());

        // Defaults to on whenever a distribution is configured
        let invalidation_enabled =
            parse_flag("CDN_INVALIDATION_ENABLED")?.unwrap_or(distribution_id.is_some());

        if invalidation_enabled && distribution_id.is_none() {
            anyhow::bail!("CDN_INVALIDATION_ENABLED requires CDN_DISTRIBUTION_ID");
        }

        Ok(Self {
            domain_suffix: env::var("CDN_DOMAIN_SUFFIX")
                .unwrap_or_else(|_| DEFAULT_CDN_DOMAIN_SUFFIX.to_string()),
            distribution_id,
            region: env::var("CDN_REGION").unwrap_or_else(|_| DEFAULT_CDN_REGION.to_string()),
            path_prefix: env::var("CDN_PATH_PREFIX")
                .unwrap_or_else(|_| DEFAULT_PATH_PREFIX.to_string()),
            invalidation_enabled,
        })
    }

    pub fn invalidator_config(&self) -> InvalidatorConfig {
        match (&self.distribution_id, self.invalidation_enabled) {
            (Some(id), true) => InvalidatorConfig::new(id.clone(), self.path_prefix.clone()),
            _ => InvalidatorConfig::disabled(),
        }
    }
}

impl Default for CdnSettings {
    fn default() -> Self {
        Self {
            domain_suffix: DEFAULT_CDN_DOMAIN_SUFFIX.to_string(),
            distribution_id: None,
            region: DEFAULT_CDN_REGION.to_string(),
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            invalidation_enabled: false,
        }
    }
}

fn parse_flag(name: &str) -> Result<Option<bool>> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            other => anyhow::bail!("Invalid {name}: {other}"),
        },
        Err(_) => Ok(None),
    }
}
