//! Test fixtures with sample data.

use dusseldorf_auth::ClaimSet;
use dusseldorf_common::{TracingConfig, init_tracing};
use serde_json::json;

/// Issuer configuration with one standard and one fully configured Azure
/// issuer.
pub const SAMPLE_ISSUERS_JSON: &str = r#"[
    {
        "type": "standard",
        "issuer": "https://tokendings.example.com",
        "jwks_uri": "https://tokendings.example.com/jwks",
        "audience": "dev-gcp:dusseldorf:k9-sak",
        "alias": "tokendings"
    },
    {
        "type": "azure",
        "issuer": "https://login.microsoftonline.com/tenant/v2.0",
        "jwks_uri": "https://login.microsoftonline.com/tenant/discovery/v2.0/keys",
        "audience": "api://k9-sak",
        "alias": "azure-v2",
        "authorized_clients": ["k9-los", "k9-punsj"],
        "required_groups": ["saksbehandler"],
        "required_roles": ["access_as_application"],
        "required_scopes": ["k9.read"],
        "require_certificate_client_authentication": true
    }
]"#;

/// Issuer string of the Azure issuer in [`SAMPLE_ISSUERS_JSON`].
pub const AZURE_ISSUER: &str = "https://login.microsoftonline.com/tenant/v2.0";

/// Issuer string of the standard issuer in [`SAMPLE_ISSUERS_JSON`].
pub const TOKENDINGS_ISSUER: &str = "https://tokendings.example.com";

/// Claims satisfying the Azure issuer in [`SAMPLE_ISSUERS_JSON`].
#[must_use]
pub fn azure_application_claims() -> ClaimSet {
    ClaimSet::from_value(json!({
        "iss": AZURE_ISSUER,
        "aud": "api://k9-sak",
        "azp": "k9-los",
        "azpacr": "2",
        "groups": ["saksbehandler", "veileder"],
        "roles": ["access_as_application"],
        "scp": "k9.read k9.write"
    }))
}

/// Claims satisfying the standard issuer in [`SAMPLE_ISSUERS_JSON`].
#[must_use]
pub fn tokendings_claims() -> ClaimSet {
    ClaimSet::from_value(json!({
        "iss": TOKENDINGS_ISSUER,
        "aud": "dev-gcp:dusseldorf:k9-sak",
        "sub": "12345678910"
    }))
}

/// Install a plain subscriber with the library targets at `debug`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let config = TracingConfig::new("dusseldorf-test").with_library_log_level("debug");
    let _ = init_tracing(&config);
}
