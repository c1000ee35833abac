//! Correlation id verification and generation.
//!
//! Backend services take the id from `X-Correlation-ID`; frontends generate
//! one per request. Invalid ids are replaced, never propagated.

use crate::problem::{InvalidParameter, ParameterType, ProblemDetails};
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

/// Header carrying the correlation id.
pub const X_CORRELATION_ID: &str = "X-Correlation-ID";

#[allow(clippy::expect_used)]
static CALL_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.\-æøåÆØÅ]{5,200}$").expect("valid regex"));

/// Check an id against the allowed alphabet and length.
///
/// Logs a warning with a percent-encoded rendering of rejected ids.
#[must_use]
pub fn verify_call_id(kind: &str, id: &str) -> bool {
    let valid = CALL_ID_PATTERN.is_match(id);
    if !valid {
        tracing::warn!(
            kind,
            id = %url::form_urlencoded::byte_serialize(id.as_bytes()).collect::<String>(),
            "invalid id (url-encoded)"
        );
    }
    valid
}

/// Generate a fresh correlation id.
#[must_use]
pub fn generate_call_id() -> String {
    Uuid::new_v4().to_string()
}

/// Resolve the id to use for a request from the incoming header value.
///
/// `None` when the header is absent, the header value when it is valid, a
/// freshly generated id otherwise.
#[must_use]
pub fn resolve_call_id(header: Option<&str>) -> Option<String> {
    header.map(|id| {
        if verify_call_id(X_CORRELATION_ID, id) {
            id.to_string()
        } else {
            generate_call_id()
        }
    })
}

/// Problem returned when a request arrives without a correlation id.
#[must_use]
pub fn call_id_required_problem() -> ProblemDetails {
    ProblemDetails::validation(vec![InvalidParameter {
        name: X_CORRELATION_ID.to_string(),
        reason: "Correlation ID må settes.".to_string(),
        parameter_type: ParameterType::Header,
        invalid_value: None,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_norwegian_letters() {
        assert!(verify_call_id(X_CORRELATION_ID, "søknad-æøå-123"));
    }

    #[test]
    fn test_rejects_short_and_long() {
        assert!(!verify_call_id(X_CORRELATION_ID, "abcd"));
        assert!(!verify_call_id(X_CORRELATION_ID, &"a".repeat(201)));
        assert!(verify_call_id(X_CORRELATION_ID, &"a".repeat(200)));
    }

    #[test]
    fn test_rejects_forbidden_characters() {
        assert!(!verify_call_id(X_CORRELATION_ID, "abc def"));
        assert!(!verify_call_id(X_CORRELATION_ID, "abcde<script>"));
    }

    #[test]
    fn test_generated_ids_are_valid() {
        let id = generate_call_id();
        assert!(verify_call_id(X_CORRELATION_ID, &id));
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve_call_id(None), None);
        assert_eq!(resolve_call_id(Some("call-12345")), Some("call-12345".to_string()));

        let replaced = resolve_call_id(Some("bad id")).unwrap();
        assert_ne!(replaced, "bad id");
        assert!(verify_call_id(X_CORRELATION_ID, &replaced));
    }

    #[test]
    fn test_required_problem() {
        let problem = call_id_required_problem();
        assert_eq!(problem.status, 400);
        assert_eq!(problem.invalid_parameters[0].name, X_CORRELATION_ID);
    }
}
