//! Error types for CDN invalidation

use thiserror::Error;

/// CDN invalidation errors
///
/// These never leave the invalidator: they are recorded in stats and logged,
/// and the mutation that triggered them still succeeds.
#[derive(Error, Debug, Clone)]
pub enum InvalidationError {
    /// The CDN API rejected or failed the request
    #[error("CDN error: {0}")]
    Cdn(String),

    /// Request could not be built from the configured values
    #[error("Configuration error: {0}")]
    Configuration(String),
}
