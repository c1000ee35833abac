//! Problem-details error payloads (RFC 7807).
//!
//! The web layer renders these as `application/problem+json`. Builders here
//! never embed secrets: callers pass identifiers, not claim values.

use serde::{Deserialize, Serialize};

/// Where an invalid parameter was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    /// Request header
    Header,
    /// Token claim
    Claim,
}

/// One violated parameter in a validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidParameter {
    /// Parameter name
    pub name: String,
    /// Human-readable reason
    pub reason: String,
    /// Where the parameter lives
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    /// The offending value, when safe to echo back
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_value: Option<String>,
}

/// A problem-details payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// Problem type URI
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Short summary
    pub title: String,
    /// HTTP status code
    pub status: u16,
    /// Occurrence-specific explanation
    pub detail: String,
    /// Occurrence URI, typically the correlation id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Validation violations, if any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalid_parameters: Vec<InvalidParameter>,
}

impl ProblemDetails {
    /// Create a problem with no parameters.
    #[must_use]
    pub fn new(
        problem_type: impl Into<String>,
        title: impl Into<String>,
        status: u16,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            problem_type: problem_type.into(),
            title: title.into(),
            status,
            detail: detail.into(),
            instance: None,
            invalid_parameters: Vec::new(),
        }
    }

    /// A 400 problem listing the given violations.
    #[must_use]
    pub fn validation(invalid_parameters: Vec<InvalidParameter>) -> Self {
        Self {
            invalid_parameters,
            ..Self::new(
                "/problem-details/invalid-request-parameters",
                "invalid-request-parameters",
                400,
                "Requesten inneholder ugyldige parametre.",
            )
        }
    }

    /// Attach an instance identifier.
    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_problem_shape() {
        let problem = ProblemDetails::validation(vec![InvalidParameter {
            name: "X-Correlation-ID".to_string(),
            reason: "Correlation ID må settes.".to_string(),
            parameter_type: ParameterType::Header,
            invalid_value: None,
        }]);

        let value = serde_json::to_value(&problem).unwrap();
        assert_eq!(value["status"], 400);
        assert_eq!(value["type"], "/problem-details/invalid-request-parameters");
        assert_eq!(value["invalid_parameters"][0]["type"], "header");
        assert!(value["invalid_parameters"][0].get("invalid_value").is_none());
        assert!(value.get("instance").is_none());
    }

    #[test]
    fn test_plain_problem_omits_parameters() {
        let problem = ProblemDetails::new("/problem-details/unauthorized", "unauthorized", 403, "no")
            .with_instance("call-123");
        let value = serde_json::to_value(&problem).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "/problem-details/unauthorized",
                "title": "unauthorized",
                "status": 403,
                "detail": "no",
                "instance": "call-123"
            })
        );
    }
}
