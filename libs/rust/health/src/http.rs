//! Probe of downstream HTTP dependencies.
//!
//! One bounded GET per target, issued concurrently. The check is healthy
//! only when every target answers with its expected status.

use crate::check::HealthCheck;
use crate::error::HealthError;
use crate::result::HealthResult;
use async_trait::async_trait;
use dusseldorf_common::{HttpConfig, PlatformError, build_http_client};
use futures::future::join_all;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::Url;

const NAME: &str = "HttpDependencyHealthCheck";

/// What one target answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyResponse {
    /// Response body, or why no response was received
    pub message: String,
    /// Status the target should answer with
    pub expected_http_status_code: u16,
    /// Status it did answer with; `None` when the request failed
    pub actual_http_status_code: Option<u16>,
}

impl DependencyResponse {
    /// Whether the target answered as expected.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.actual_http_status_code == Some(self.expected_http_status_code)
    }
}

/// Health check over a set of URL -> expected status targets.
#[derive(Debug, Clone)]
pub struct HttpDependencyHealthCheck {
    client: Client,
    targets: BTreeMap<Url, StatusCode>,
}

impl HttpDependencyHealthCheck {
    /// Probe `targets` with the 2s connect / 2s read health-check client.
    ///
    /// Proxy routing is taken from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy setting is invalid or the client cannot
    /// be built.
    pub fn new(targets: impl IntoIterator<Item = (Url, StatusCode)>) -> Result<Self, PlatformError> {
        Self::with_config(targets, &HttpConfig::health_check().from_env()?)
    }

    /// Probe `targets` with a client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn with_config(
        targets: impl IntoIterator<Item = (Url, StatusCode)>,
        config: &HttpConfig,
    ) -> Result<Self, PlatformError> {
        Ok(Self::with_client(targets, build_http_client(config)?))
    }

    /// Probe `targets` with an existing client. The client must carry its own
    /// timeouts.
    #[must_use]
    pub fn with_client(targets: impl IntoIterator<Item = (Url, StatusCode)>, client: Client) -> Self {
        Self {
            client,
            targets: targets.into_iter().collect(),
        }
    }

    /// The configured targets.
    #[must_use]
    pub const fn targets(&self) -> &BTreeMap<Url, StatusCode> {
        &self.targets
    }

    async fn probe(&self, url: &Url, expected: StatusCode) -> DependencyResponse {
        let expected_http_status_code = expected.as_u16();
        match self.client.get(url.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                let message = match response.text().await {
                    Ok(body) => body,
                    Err(cause) => {
                        tracing::error!(%url, error = %cause, "failed to read response body");
                        format!("Kunne ikke lese response. {cause}")
                    }
                };
                DependencyResponse {
                    message,
                    expected_http_status_code,
                    actual_http_status_code: Some(status.as_u16()),
                }
            }
            Err(cause) => {
                tracing::error!(%url, error = %cause, "no response from dependency");
                DependencyResponse {
                    message: format!("Mottok ingen response. {cause}"),
                    expected_http_status_code,
                    actual_http_status_code: None,
                }
            }
        }
    }

    /// Probe every target concurrently.
    pub async fn responses(&self) -> BTreeMap<Url, DependencyResponse> {
        let probes = self
            .targets
            .iter()
            .map(|(url, expected)| async move { (url.clone(), self.probe(url, *expected).await) });
        join_all(probes).await.into_iter().collect()
    }
}

#[async_trait]
impl HealthCheck for HttpDependencyHealthCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn check(&self) -> Result<HealthResult, HealthError> {
        let responses = self.responses().await;
        let healthy = responses.values().all(DependencyResponse::is_healthy);

        let mut result = Map::new();
        for (url, response) in responses {
            let record = serde_json::to_value(&response).map_err(anyhow::Error::from)?;
            result.insert(url.to_string(), record);
        }

        Ok(if healthy {
            HealthResult::healthy(NAME, Value::Object(result))
        } else {
            HealthResult::unhealthy(NAME, Value::Object(result))
        })
    }
}
