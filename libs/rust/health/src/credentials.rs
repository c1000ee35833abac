//! Probe that the service can obtain its own system credentials.

use crate::check::HealthCheck;
use crate::error::HealthError;
use crate::result::HealthResult;
use async_trait::async_trait;
use dusseldorf_common::PlatformError;
use secrecy::SecretString;
use std::sync::Arc;

const NAME: &str = "CredentialsProviderHealthCheck";
const OK_MESSAGE: &str = "Henting av system credentials OK.";
const FALLBACK_MESSAGE: &str = "Feil ved henting av system credentials.";

/// Source of the service's own access token.
#[async_trait]
pub trait SystemCredentialsProvider: Send + Sync {
    /// Obtain a ready `Authorization` header value.
    async fn authorization_header(&self) -> Result<SecretString, PlatformError>;
}

/// Healthy iff the provider hands out a credential.
///
/// The credential itself is dropped unread.
#[derive(Clone)]
pub struct CredentialsProviderHealthCheck {
    provider: Arc<dyn SystemCredentialsProvider>,
}

impl CredentialsProviderHealthCheck {
    /// Probe `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn SystemCredentialsProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl HealthCheck for CredentialsProviderHealthCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn check(&self) -> Result<HealthResult, HealthError> {
        let result = match self.provider.authorization_header().await {
            Ok(_) => HealthResult::healthy(NAME, OK_MESSAGE),
            Err(cause) => {
                tracing::error!(error = %cause, "failed to fetch system credentials");
                let message = cause.to_string();
                if message.is_empty() {
                    HealthResult::unhealthy(NAME, FALLBACK_MESSAGE)
                } else {
                    HealthResult::unhealthy(NAME, message)
                }
            }
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    struct Fixed(Result<&'static str, &'static str>);

    #[async_trait]
    impl SystemCredentialsProvider for Fixed {
        async fn authorization_header(&self) -> Result<SecretString, PlatformError> {
            self.0
                .map(|token| SecretString::from(format!("Bearer {token}")))
                .map_err(PlatformError::unavailable)
        }
    }

    #[tokio::test]
    async fn test_healthy_when_credentials_fetched() {
        let check = CredentialsProviderHealthCheck::new(Arc::new(Fixed(Ok("s3cr3t"))));
        let result = check.check().await.unwrap();

        assert!(result.is_healthy());
        assert_eq!(result.name(), Some(NAME));
        let rendered = Value::Object(result.into_result()).to_string();
        assert!(!rendered.contains("s3cr3t"));
    }

    #[tokio::test]
    async fn test_unhealthy_carries_fault_message() {
        let check = CredentialsProviderHealthCheck::new(Arc::new(Fixed(Err("token endpoint down"))));
        let result = check.check().await.unwrap();

        assert!(!result.is_healthy());
        assert_eq!(
            result.result()["result"],
            "Service unavailable: token endpoint down"
        );
    }
}
