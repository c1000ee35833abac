//! The health check capability.

use crate::error::HealthError;
use crate::result::HealthResult;
use async_trait::async_trait;

/// Anything that can report Healthy/Unhealthy on demand.
///
/// Implementations may be called concurrently and repeatedly. Any call that
/// touches the network must bound itself with a timeout, and dependency
/// faults must come back as `Ok(HealthResult::Unhealthy(..))`. `Err` is
/// reserved for a check that cannot produce a result at all.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Implementation name used to label results the check did not produce.
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Probe the dependency.
    async fn check(&self) -> Result<HealthResult, HealthError>;
}

/// `a::b::Probe<c::D>` -> `Probe`
fn short_type_name(full: &'static str) -> &'static str {
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics.rsplit("::").next().unwrap_or(without_generics)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysUp;

    #[async_trait]
    impl HealthCheck for AlwaysUp {
        async fn check(&self) -> Result<HealthResult, HealthError> {
            Ok(HealthResult::healthy(self.name(), "up"))
        }
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("a::b::Probe"), "Probe");
        assert_eq!(short_type_name("a::b::Probe<c::D>"), "Probe");
        assert_eq!(short_type_name("Probe"), "Probe");
    }

    #[test]
    fn test_default_name_through_trait_object() {
        let check: Box<dyn HealthCheck> = Box::new(AlwaysUp);
        assert_eq!(check.name(), "AlwaysUp");
    }
}
