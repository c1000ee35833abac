//! Health probe outcomes.

use serde_json::{Map, Value};

/// Free-form payload of a probe result. Always carries `name` and `result`.
pub type ResultMap = Map<String, Value>;

/// Outcome of one health probe.
///
/// The tag and payload are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum HealthResult {
    /// The dependency is available.
    Healthy(ResultMap),
    /// The dependency is unavailable or misbehaving.
    Unhealthy(ResultMap),
}

fn payload(name: impl Into<String>, result: impl Into<Value>) -> ResultMap {
    let mut map = ResultMap::new();
    map.insert("name".to_string(), Value::String(name.into()));
    map.insert("result".to_string(), result.into());
    map
}

impl HealthResult {
    /// A healthy result for probe `name`.
    #[must_use]
    pub fn healthy(name: impl Into<String>, result: impl Into<Value>) -> Self {
        Self::Healthy(payload(name, result))
    }

    /// An unhealthy result for probe `name`.
    #[must_use]
    pub fn unhealthy(name: impl Into<String>, result: impl Into<Value>) -> Self {
        Self::Unhealthy(payload(name, result))
    }

    /// Whether the probe passed.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy(_))
    }

    /// The payload.
    #[must_use]
    pub const fn result(&self) -> &ResultMap {
        match self {
            Self::Healthy(map) | Self::Unhealthy(map) => map,
        }
    }

    /// The probe name recorded in the payload.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.result().get("name").and_then(Value::as_str)
    }

    /// Consume into the payload.
    #[must_use]
    pub fn into_result(self) -> ResultMap {
        match self {
            Self::Healthy(map) | Self::Unhealthy(map) => map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let result = HealthResult::healthy("Probe", "OK");
        assert!(result.is_healthy());
        assert_eq!(result.name(), Some("Probe"));
        assert_eq!(Value::Object(result.into_result()), json!({"name": "Probe", "result": "OK"}));
    }

    #[test]
    fn test_unhealthy_carries_structured_result() {
        let result = HealthResult::unhealthy("Probe", json!({"https://a": {"message": "down"}}));
        assert!(!result.is_healthy());
        assert_eq!(result.result()["result"]["https://a"]["message"], "down");
    }
}
