//! Faults raised by a health check implementation itself.
//!
//! Dependency faults never show up here: checks convert those into
//! [`HealthResult::Unhealthy`](crate::HealthResult::Unhealthy). A
//! `HealthError` is a check that could not produce a result at all, and the
//! aggregator turns it into an unhealthy entry.

use thiserror::Error;

/// A health check failed to produce a result.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HealthError {
    /// The check panicked
    #[error("Health check panicked: {0}")]
    Panicked(String),

    /// Unexpected failure inside the check
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl HealthError {
    /// Build from a panic payload.
    #[must_use]
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Self::Panicked(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_panic_str() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(HealthError::from_panic(payload.as_ref()).to_string(), "Health check panicked: boom");
    }

    #[test]
    fn test_from_panic_string() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert!(matches!(HealthError::from_panic(payload.as_ref()), HealthError::Panicked(m) if m == "bang"));
    }

    #[test]
    fn test_internal_is_transparent() {
        let err: HealthError = anyhow::anyhow!("pool exhausted").into();
        assert_eq!(err.to_string(), "pool exhausted");
    }
}
