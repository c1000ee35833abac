//! Mock implementations for testing.
//!
//! Health checks with scripted outcomes and a credentials provider that can
//! be switched between success and failure.

use async_trait::async_trait;
use dusseldorf_common::PlatformError;
use dusseldorf_health::{HealthCheck, HealthError, HealthResult};
use secrecy::SecretString;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Health check returning a fixed result and counting invocations.
#[derive(Debug)]
pub struct StaticHealthCheck {
    result: HealthResult,
    calls: AtomicUsize,
}

impl StaticHealthCheck {
    /// Always healthy.
    #[must_use]
    pub fn healthy(name: &str) -> Self {
        Self::new(HealthResult::healthy(name, "OK"))
    }

    /// Always unhealthy.
    #[must_use]
    pub fn unhealthy(name: &str, message: &str) -> Self {
        Self::new(HealthResult::unhealthy(name, message))
    }

    /// Always `result`.
    #[must_use]
    pub const fn new(result: HealthResult) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    /// How often the check ran.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthCheck for StaticHealthCheck {
    async fn check(&self) -> Result<HealthResult, HealthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

/// Health check that fails to execute.
#[derive(Debug, Clone)]
pub struct FailingHealthCheck {
    message: String,
}

impl FailingHealthCheck {
    /// Fail with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl HealthCheck for FailingHealthCheck {
    async fn check(&self) -> Result<HealthResult, HealthError> {
        Err(anyhow::anyhow!(self.message.clone()).into())
    }
}

/// Health check that panics.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingHealthCheck;

#[async_trait]
impl HealthCheck for PanickingHealthCheck {
    async fn check(&self) -> Result<HealthResult, HealthError> {
        panic!("health check panicked on purpose")
    }
}

/// Health check that sleeps before answering healthy.
#[derive(Debug, Clone)]
pub struct SlowHealthCheck {
    name: String,
    delay: Duration,
}

impl SlowHealthCheck {
    /// Answer after `delay`.
    #[must_use]
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
        }
    }
}

#[async_trait]
impl HealthCheck for SlowHealthCheck {
    async fn check(&self) -> Result<HealthResult, HealthError> {
        tokio::time::sleep(self.delay).await;
        Ok(HealthResult::healthy(self.name.clone(), "OK"))
    }
}

/// Credentials provider whose availability can be toggled.
#[derive(Debug, Clone)]
pub struct MockCredentialsProvider {
    available: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockCredentialsProvider {
    /// Provider that hands out a token.
    #[must_use]
    pub fn available() -> Self {
        Self {
            available: Arc::new(AtomicBool::new(true)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Provider that fails.
    #[must_use]
    pub fn unavailable() -> Self {
        let provider = Self::available();
        provider.set_available(false);
        provider
    }

    /// Toggle availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// How often a credential was requested.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl dusseldorf_health::SystemCredentialsProvider for MockCredentialsProvider {
    async fn authorization_header(&self) -> Result<SecretString, PlatformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.available.load(Ordering::SeqCst) {
            Ok(SecretString::from("Bearer mock-access-token"))
        } else {
            Err(PlatformError::unavailable("token endpoint refused connection"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dusseldorf_health::SystemCredentialsProvider;

    #[tokio::test]
    async fn test_static_check_counts_calls() {
        let check = StaticHealthCheck::healthy("Probe");
        check.check().await.unwrap();
        check.check().await.unwrap();
        assert_eq!(check.calls(), 2);
    }

    #[tokio::test]
    async fn test_provider_toggle() {
        let provider = MockCredentialsProvider::available();
        assert!(provider.authorization_header().await.is_ok());
        provider.set_available(false);
        assert!(provider.authorization_header().await.is_err());
        assert_eq!(provider.calls(), 2);
    }
}
