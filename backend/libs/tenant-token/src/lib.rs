//! Tenant-context tokens
//!
//! A token is `<payload_b64url>.<signature_b64url>` where the payload is the
//! JSON `{"tid":..,"exp":..,"kid":..}` and the signature is HMAC-SHA256 over the
//! encoded payload string. Both segments use URL-safe base64 without padding.
//!
//! ## Modules
//! - `payload`: wire payload and segment codec
//! - `signing`: HMAC signing and verification of parsed tokens
//! - `minter`: origin-side minting at login
//! - `cookie`: `TenantCtx` cookie construction and host scoping

pub mod cookie;
pub mod error;
pub mod minter;
pub mod payload;
pub mod signing;

pub use cookie::{removal_cookie, session_cookie, CookieScopePolicy, TENANT_CTX_COOKIE};
pub use error::{Result, TokenError};
pub use minter::{
    MintedToken, TokenMinter, DEFAULT_KEY_ID, DEFAULT_TOKEN_TTL_MINUTES,
    MAX_TOKEN_TTL_MINUTES,
};
pub use payload::TenantContextPayload;
pub use signing::{sign_payload, verify_token, SignedToken};
