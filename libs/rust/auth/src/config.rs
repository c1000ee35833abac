//! Issuer configuration with validation.
//!
//! Issuers are read once at startup, either from a JSON document or from the
//! `ISSUERS` environment variable, and are immutable afterwards.

use crate::claims::{ClaimName, ClaimSet};
use crate::evaluator::ClaimRuleEvaluator;
use crate::issuer::{AzureIssuer, Issuer, StandardIssuer};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use thiserror::Error;
use url::Url;

/// Environment variable holding the issuer JSON array.
pub const ISSUERS_ENV: &str = "ISSUERS";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid URL format
    #[error("Invalid URL for {field}: {reason}")]
    InvalidUrl {
        /// Offending field
        field: String,
        /// Why it was rejected
        reason: String,
    },

    /// Missing required field
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    /// Two issuers share an issuer string or alias
    #[error("Duplicate {field}: {value}")]
    Duplicate {
        /// `issuer` or `alias`
        field: &'static str,
        /// The repeated value
        value: String,
    },

    /// Document could not be parsed
    #[error("Failed to parse issuer configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One issuer entry as written in configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssuerConfig {
    /// Generic OIDC provider
    Standard {
        /// Expected `iss` claim
        issuer: String,
        /// Key discovery location
        jwks_uri: Url,
        /// Required audience
        #[serde(default)]
        audience: Option<String>,
        /// Short name
        alias: String,
    },
    /// Azure AD
    Azure {
        /// Expected `iss` claim
        issuer: String,
        /// Key discovery location
        jwks_uri: Url,
        /// Required audience
        audience: String,
        /// Short name
        alias: String,
        /// Accepted `azp` values
        #[serde(default)]
        authorized_clients: BTreeSet<String>,
        /// Groups the subject must be in
        #[serde(default)]
        required_groups: BTreeSet<String>,
        /// Roles the token must carry
        #[serde(default)]
        required_roles: BTreeSet<String>,
        /// Scopes the token must carry
        #[serde(default)]
        required_scopes: BTreeSet<String>,
        /// Require certificate client credentials
        #[serde(default)]
        require_certificate_client_authentication: bool,
    },
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingRequired(field.to_string()));
    }
    Ok(())
}

fn validate_jwks_uri(uri: &Url) -> Result<(), ConfigError> {
    match uri.scheme() {
        "http" | "https" if uri.has_host() => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            field: "jwks_uri".to_string(),
            reason: format!("expected an absolute http(s) URL, got {uri}"),
        }),
    }
}

impl TryFrom<IssuerConfig> for Issuer {
    type Error = ConfigError;

    fn try_from(config: IssuerConfig) -> Result<Self, Self::Error> {
        match config {
            IssuerConfig::Standard {
                issuer,
                jwks_uri,
                audience,
                alias,
            } => {
                require_non_empty("issuer", &issuer)?;
                require_non_empty("alias", &alias)?;
                validate_jwks_uri(&jwks_uri)?;
                if let Some(audience) = &audience {
                    require_non_empty("audience", audience)?;
                }
                Ok(StandardIssuer::new(issuer, jwks_uri, audience, alias).into())
            }
            IssuerConfig::Azure {
                issuer,
                jwks_uri,
                audience,
                alias,
                authorized_clients,
                required_groups,
                required_roles,
                required_scopes,
                require_certificate_client_authentication,
            } => {
                require_non_empty("issuer", &issuer)?;
                require_non_empty("alias", &alias)?;
                require_non_empty("audience", &audience)?;
                validate_jwks_uri(&jwks_uri)?;
                Ok(AzureIssuer::new(issuer, jwks_uri, audience, alias)
                    .with_authorized_clients(authorized_clients)
                    .with_required_groups(required_groups)
                    .with_required_roles(required_roles)
                    .with_required_scopes(required_scopes)
                    .with_certificate_client_authentication(
                        require_certificate_client_authentication,
                    )
                    .into())
            }
        }
    }
}

/// All configured issuers, keyed by issuer string.
///
/// Rules are derived once here; lookups hand out the ready evaluator.
#[derive(Debug, Clone, Default)]
pub struct Issuers {
    issuers: BTreeMap<String, (Issuer, ClaimRuleEvaluator)>,
    aliases: BTreeMap<String, String>,
}

impl Issuers {
    /// Build the registry, rejecting duplicate issuers or aliases.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Duplicate`] on a repeated issuer or alias.
    pub fn new(issuers: impl IntoIterator<Item = Issuer>) -> Result<Self, ConfigError> {
        let mut registry = Self::default();
        for issuer in issuers {
            if registry.issuers.contains_key(issuer.issuer()) {
                return Err(ConfigError::Duplicate {
                    field: "issuer",
                    value: issuer.issuer().to_string(),
                });
            }
            if registry.aliases.contains_key(issuer.alias()) {
                return Err(ConfigError::Duplicate {
                    field: "alias",
                    value: issuer.alias().to_string(),
                });
            }
            tracing::info!(issuer = issuer.issuer(), alias = issuer.alias(), "configured issuer");
            registry
                .aliases
                .insert(issuer.alias().to_string(), issuer.issuer().to_string());
            let evaluator = ClaimRuleEvaluator::for_issuer(&issuer);
            registry
                .issuers
                .insert(issuer.issuer().to_string(), (issuer, evaluator));
        }
        Ok(registry)
    }

    /// Parse and validate a JSON array of [`IssuerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or any entry is invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let configs: Vec<IssuerConfig> = serde_json::from_str(json)?;
        let issuers = configs
            .into_iter()
            .map(Issuer::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(issuers)
    }

    /// Load from the [`ISSUERS_ENV`] variable, reading `.env` first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if the variable is unset, or
    /// any error from [`from_json`](Self::from_json).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let json =
            env::var(ISSUERS_ENV).map_err(|_| ConfigError::MissingRequired(ISSUERS_ENV.to_string()))?;
        Self::from_json(&json)
    }

    /// Issuer by its `iss` value.
    #[must_use]
    pub fn get(&self, issuer: &str) -> Option<&Issuer> {
        self.issuers.get(issuer).map(|(issuer, _)| issuer)
    }

    /// Issuer by alias.
    #[must_use]
    pub fn by_alias(&self, alias: &str) -> Option<&Issuer> {
        self.aliases.get(alias).and_then(|issuer| self.get(issuer))
    }

    /// The evaluator for tokens from `issuer`.
    #[must_use]
    pub fn evaluator(&self, issuer: &str) -> Option<&ClaimRuleEvaluator> {
        self.issuers.get(issuer).map(|(_, evaluator)| evaluator)
    }

    /// The evaluator for the issuer named by the `iss` claim of `claims`.
    ///
    /// `None` when the claim is missing, not a string, or names an issuer
    /// that is not configured.
    #[must_use]
    pub fn evaluator_for(&self, claims: &ClaimSet) -> Option<&ClaimRuleEvaluator> {
        claims
            .string(ClaimName::ISS)
            .and_then(|issuer| self.evaluator(issuer))
    }

    /// All issuers, ordered by issuer string.
    pub fn iter(&self) -> impl Iterator<Item = &Issuer> {
        self.issuers.values().map(|(issuer, _)| issuer)
    }

    /// Number of issuers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issuers.len()
    }

    /// Whether no issuer is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issuers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleKind;

    const CONFIG: &str = r#"[
        {
            "type": "standard",
            "issuer": "https://tokendings.local",
            "jwks_uri": "https://tokendings.local/jwks",
            "alias": "tokendings"
        },
        {
            "type": "azure",
            "issuer": "https://login.microsoftonline.com/tenant/v2.0",
            "jwks_uri": "https://login.microsoftonline.com/tenant/discovery/v2.0/keys",
            "audience": "api://k9-sak",
            "alias": "azure-v2",
            "authorized_clients": ["frontend"],
            "require_certificate_client_authentication": true
        }
    ]"#;

    #[test]
    fn test_from_json() {
        let issuers = Issuers::from_json(CONFIG).unwrap();
        assert_eq!(issuers.len(), 2);

        let azure = issuers.by_alias("azure-v2").unwrap();
        assert!(matches!(azure, Issuer::Azure(_)));
        assert_eq!(azure.audience(), Some("api://k9-sak"));

        let kinds: Vec<_> = issuers
            .evaluator("https://login.microsoftonline.com/tenant/v2.0")
            .unwrap()
            .rules()
            .iter()
            .map(crate::rule::ClaimRule::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::AudienceEquals,
                RuleKind::CertificateClientAuthentication,
                RuleKind::AuthorizedClient
            ]
        );

        let standard = issuers.get("https://tokendings.local").unwrap();
        assert_eq!(standard.audience(), None);
    }

    #[test]
    fn test_evaluator_for_follows_iss_claim() {
        let issuers = Issuers::from_json(CONFIG).unwrap();
        let claims = ClaimSet::from_value;

        let evaluator = issuers
            .evaluator_for(&claims(serde_json::json!({"iss": "https://tokendings.local"})))
            .unwrap();
        assert!(evaluator.rules().is_empty());

        assert!(issuers.evaluator_for(&claims(serde_json::json!({"iss": "https://unknown"}))).is_none());
        assert!(issuers.evaluator_for(&claims(serde_json::json!({"iss": ["https://tokendings.local"]}))).is_none());
        assert!(issuers.evaluator_for(&claims(serde_json::json!({}))).is_none());
    }

    #[test]
    fn test_azure_requires_audience() {
        let json = r#"[{"type": "azure", "issuer": "i", "jwks_uri": "https://i/jwks", "alias": "a"}]"#;
        assert!(matches!(Issuers::from_json(json), Err(ConfigError::Parse(_))));

        let json = r#"[{"type": "azure", "issuer": "i", "jwks_uri": "https://i/jwks", "alias": "a", "audience": " "}]"#;
        assert!(matches!(
            Issuers::from_json(json),
            Err(ConfigError::MissingRequired(field)) if field == "audience"
        ));
    }

    #[test]
    fn test_rejects_non_http_jwks() {
        let json = r#"[{"type": "standard", "issuer": "i", "jwks_uri": "file:///etc/jwks", "alias": "a"}]"#;
        assert!(matches!(Issuers::from_json(json), Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn test_rejects_unknown_type() {
        let json = r#"[{"type": "okta", "issuer": "i", "jwks_uri": "https://i/jwks", "alias": "a"}]"#;
        assert!(Issuers::from_json(json).is_err());
    }

    #[test]
    fn test_rejects_duplicates() {
        let json = r#"[
            {"type": "standard", "issuer": "i", "jwks_uri": "https://i/jwks", "alias": "a"},
            {"type": "standard", "issuer": "j", "jwks_uri": "https://j/jwks", "alias": "a"}
        ]"#;
        assert!(matches!(
            Issuers::from_json(json),
            Err(ConfigError::Duplicate { field: "alias", .. })
        ));

        let json = r#"[
            {"type": "standard", "issuer": "i", "jwks_uri": "https://i/jwks", "alias": "a"},
            {"type": "standard", "issuer": "i", "jwks_uri": "https://j/jwks", "alias": "b"}
        ]"#;
        assert!(matches!(
            Issuers::from_json(json),
            Err(ConfigError::Duplicate { field: "issuer", .. })
        ));
    }
}
