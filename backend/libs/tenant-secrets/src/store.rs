use crate::error::SecretError;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::error::ProvideErrorMetadata;
use aws_sdk_secretsmanager::Client as SecretsClient;
use tracing::{debug, info};

/// Source of raw secret records (JSON strings).
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn fetch_secret_string(&self, secret_id: &str) -> Result<String, SecretError>;
}

/// AWS Secrets Manager backed store
///
/// Uses AWS credentials from:
/// 1. Environment variables (AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY)
/// 2. AWS credentials file (~/.aws/credentials)
/// 3. IAM role of the execution environment (ECS task, Lambda@Edge)
pub struct AwsSecretStore {
    client: SecretsClient,
}

impl AwsSecretStore {
    /// Create a store bound to the given region
    pub async fn new(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        info!(region = %region, "Initialized AWS Secrets Manager client");

        Self {
            client: SecretsClient::new(&config),
        }
    }

    pub fn from_client(client: SecretsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    async fn fetch_secret_string(&self, secret_id: &str) -> Result<String, SecretError> {
        debug!(secret_id = %secret_id, "Fetching secret from AWS Secrets Manager");

        let response = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_resource_not_found_exception() {
                    SecretError::NotFound(secret_id.to_string())
                } else if service_error.is_decryption_failure() {
                    SecretError::DecryptionFailed(secret_id.to_string())
                } else if service_error.code() == Some("AccessDeniedException") {
                    SecretError::AccessDenied(secret_id.to_string())
                } else {
                    SecretError::AwsSdk(service_error.to_string())
                }
            })?;

        response
            .secret_string()
            .map(|s| s.to_string())
            .ok_or_else(|| SecretError::InvalidFormat("Secret is binary, not string".to_string()))
    }
}

/// Fixed in-process record for local development. Never touches the network.
#[derive(Debug, Clone)]
pub struct StaticKeyStore {
    record: String,
}

impl StaticKeyStore {
    pub fn new(record: impl Into<String>) -> Self {
        Self {
            record: record.into(),
        }
    }

    /// Build the same JSON shape the real secret uses, holding one base64 key
    pub fn from_base64_key(key_field: &str, key_base64: &str) -> Self {
        let record = serde_json::json!({ key_field: key_base64 }).to_string();
        Self { record }
    }
}

#[async_trait]
impl SecretStore for StaticKeyStore {
    async fn fetch_secret_string(&self, _secret_id: &str) -> Result<String, SecretError> {
        Ok(self.record.clone())
    }
}
