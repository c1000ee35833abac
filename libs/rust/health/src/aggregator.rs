//! Concurrent fan-out over health checks and the merged report.
//!
//! All checks run concurrently inside the caller's task and are joined before
//! the report is built. Dropping the aggregation future drops every
//! in-flight check with it.

use crate::check::HealthCheck;
use crate::error::HealthError;
use crate::result::{HealthResult, ResultMap};
use futures::FutureExt;
use futures::future::join_all;
use reqwest::StatusCode;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

const FALLBACK_MESSAGE: &str = "Feil ved eksekvering av helsesjekk.";

/// Merged outcome of a set of checks, in submission order.
///
/// Serializes to `{"healthy": [...], "unhealthy": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthReport {
    /// Payloads of passing checks
    pub healthy: Vec<ResultMap>,
    /// Payloads of failing checks
    pub unhealthy: Vec<ResultMap>,
}

impl HealthReport {
    /// Partition results by tag, keeping their order.
    #[must_use]
    pub fn from_results(results: impl IntoIterator<Item = HealthResult>) -> Self {
        let mut report = Self::default();
        for result in results {
            match result {
                HealthResult::Healthy(map) => report.healthy.push(map),
                HealthResult::Unhealthy(map) => report.unhealthy.push(map),
            }
        }
        report
    }

    /// Whether every check passed.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.unhealthy.is_empty()
    }

    /// Status the health route should answer with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        if self.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Turn a check's own failure into an unhealthy entry labelled with its name.
fn settle(name: &'static str, outcome: Result<HealthResult, HealthError>) -> HealthResult {
    match outcome {
        Ok(result) => result,
        Err(cause) => {
            tracing::error!(check = name, error = %cause, "health check failed to execute");
            let message = cause.to_string();
            if message.is_empty() {
                HealthResult::unhealthy(name, FALLBACK_MESSAGE)
            } else {
                HealthResult::unhealthy(name, message)
            }
        }
    }
}

/// Run a single check, isolating panics.
async fn run(check: &dyn HealthCheck) -> HealthResult {
    let name = check.name();
    let outcome = AssertUnwindSafe(check.check())
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(HealthError::from_panic(panic.as_ref())));
    settle(name, outcome)
}

/// Run every check concurrently and merge the results.
///
/// Never fails: a check that errors or panics becomes an unhealthy entry and
/// the others are unaffected. No timeout is applied here; each check bounds
/// itself.
pub async fn aggregate(checks: &[Arc<dyn HealthCheck>]) -> HealthReport {
    let results = join_all(checks.iter().map(|check| run(check.as_ref()))).await;
    let report = HealthReport::from_results(results);
    tracing::debug!(
        healthy = report.healthy.len(),
        unhealthy = report.unhealthy.len(),
        "health checks aggregated"
    );
    report
}

/// A fixed set of checks behind a health route.
#[derive(Clone, Default)]
pub struct HealthAggregator {
    checks: Vec<Arc<dyn HealthCheck>>,
}

impl HealthAggregator {
    /// Create an aggregator without checks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check.
    #[must_use]
    pub fn with_check(mut self, check: impl HealthCheck + 'static) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    /// Add a shared check.
    #[must_use]
    pub fn with_shared_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.checks.push(check);
        self
    }

    /// Number of checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether no check is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run all checks and merge the results.
    pub async fn aggregate(&self) -> HealthReport {
        aggregate(&self.checks).await
    }
}

impl std::fmt::Debug for HealthAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthAggregator")
            .field("checks", &self.checks.iter().map(|c| c.name()).collect::<Vec<_>>())
            .finish()
    }
}
