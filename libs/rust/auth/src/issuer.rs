//! Token issuers and the claim rules they require.
//!
//! Issuers form a closed set of provider families. Each family derives its
//! own rule set through [`DeriveClaimRules`]; derivation is pure, so an
//! unchanged issuer always yields an equal set.

use crate::rule::{AzureClaimRules, ClaimRules, StandardClaimRules};
use std::collections::BTreeSet;
use url::Url;

/// Capability of producing the rule set a token must satisfy.
pub trait DeriveClaimRules {
    /// Derive the rules from the current configuration.
    fn claim_rules(&self) -> ClaimRules;
}

/// An issuer with no provider-specific policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardIssuer {
    issuer: String,
    jwks_uri: Url,
    audience: Option<String>,
    alias: String,
}

impl StandardIssuer {
    /// Create a standard issuer.
    #[must_use]
    pub fn new(
        issuer: impl Into<String>,
        jwks_uri: Url,
        audience: Option<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            jwks_uri,
            audience,
            alias: alias.into(),
        }
    }

    /// The `iss` value tokens from this issuer carry.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Where signing keys are published.
    #[must_use]
    pub const fn jwks_uri(&self) -> &Url {
        &self.jwks_uri
    }

    /// Required audience, if any.
    #[must_use]
    pub fn audience(&self) -> Option<&str> {
        self.audience.as_deref()
    }

    /// Short name used for lookup and logging.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl DeriveClaimRules for StandardIssuer {
    fn claim_rules(&self) -> ClaimRules {
        let mut rules = ClaimRules::new();
        if let Some(audience) = &self.audience {
            rules.insert(StandardClaimRules::enforce_audience_equals(audience.clone()));
        }
        rules
    }
}

/// An Azure AD issuer.
///
/// Audience is mandatory. Every other policy is opt-in and adds one rule
/// when configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureIssuer {
    base: StandardIssuer,
    authorized_clients: BTreeSet<String>,
    required_groups: BTreeSet<String>,
    required_roles: BTreeSet<String>,
    required_scopes: BTreeSet<String>,
    require_certificate_client_authentication: bool,
}

impl AzureIssuer {
    /// Create an Azure issuer with only the audience rule.
    #[must_use]
    pub fn new(
        issuer: impl Into<String>,
        jwks_uri: Url,
        audience: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            base: StandardIssuer::new(issuer, jwks_uri, Some(audience.into()), alias),
            authorized_clients: BTreeSet::new(),
            required_groups: BTreeSet::new(),
            required_roles: BTreeSet::new(),
            required_scopes: BTreeSet::new(),
            require_certificate_client_authentication: false,
        }
    }

    /// Only accept tokens issued to one of these clients.
    #[must_use]
    pub fn with_authorized_clients<I, S>(mut self, clients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorized_clients = clients.into_iter().map(Into::into).collect();
        self
    }

    /// Require membership in all of these groups.
    #[must_use]
    pub fn with_required_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Require all of these roles.
    #[must_use]
    pub fn with_required_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Require all of these scopes.
    #[must_use]
    pub fn with_required_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Require certificate-bound client authentication.
    #[must_use]
    pub const fn with_certificate_client_authentication(mut self, required: bool) -> Self {
        self.require_certificate_client_authentication = required;
        self
    }

    /// Issuer fields shared with [`StandardIssuer`].
    #[must_use]
    pub const fn base(&self) -> &StandardIssuer {
        &self.base
    }
}

impl DeriveClaimRules for AzureIssuer {
    fn claim_rules(&self) -> ClaimRules {
        let mut rules = self.base.claim_rules();
        if self.require_certificate_client_authentication {
            rules.insert(AzureClaimRules::enforce_certificate_client_authentication());
        }
        if !self.authorized_clients.is_empty() {
            rules.insert(AzureClaimRules::enforce_authorized_client(
                self.authorized_clients.iter().cloned(),
            ));
        }
        if !self.required_groups.is_empty() {
            rules.insert(AzureClaimRules::enforce_in_all_groups(
                self.required_groups.iter().cloned(),
            ));
        }
        if !self.required_roles.is_empty() {
            rules.insert(AzureClaimRules::enforce_has_all_roles(
                self.required_roles.iter().cloned(),
            ));
        }
        if !self.required_scopes.is_empty() {
            rules.insert(AzureClaimRules::enforce_has_all_scopes(
                self.required_scopes.iter().cloned(),
            ));
        }
        rules
    }
}

/// Any configured issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issuer {
    /// Generic OIDC provider
    Standard(StandardIssuer),
    /// Azure AD
    Azure(AzureIssuer),
}

impl Issuer {
    const fn base(&self) -> &StandardIssuer {
        match self {
            Self::Standard(issuer) => issuer,
            Self::Azure(issuer) => issuer.base(),
        }
    }

    /// The `iss` value tokens from this issuer carry.
    #[must_use]
    pub fn issuer(&self) -> &str {
        self.base().issuer()
    }

    /// Where signing keys are published.
    #[must_use]
    pub const fn jwks_uri(&self) -> &Url {
        self.base().jwks_uri()
    }

    /// Required audience, if any.
    #[must_use]
    pub fn audience(&self) -> Option<&str> {
        self.base().audience()
    }

    /// Short name used for lookup and logging.
    #[must_use]
    pub fn alias(&self) -> &str {
        self.base().alias()
    }
}

impl DeriveClaimRules for Issuer {
    fn claim_rules(&self) -> ClaimRules {
        let rules = match self {
            Self::Standard(issuer) => issuer.claim_rules(),
            Self::Azure(issuer) => issuer.claim_rules(),
        };
        tracing::debug!(
            issuer = self.issuer(),
            alias = self.alias(),
            rules = ?rules.iter().map(|r| r.kind().as_str()).collect::<Vec<_>>(),
            "derived claim rules"
        );
        rules
    }
}

impl From<StandardIssuer> for Issuer {
    fn from(issuer: StandardIssuer) -> Self {
        Self::Standard(issuer)
    }
}

impl From<AzureIssuer> for Issuer {
    fn from(issuer: AzureIssuer) -> Self {
        Self::Azure(issuer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{ClaimRule, RuleKind};

    fn jwks() -> Url {
        Url::parse("https://login.microsoftonline.com/tenant/discovery/v2.0/keys").unwrap()
    }

    #[test]
    fn test_standard_without_audience_has_no_rules() {
        let issuer = StandardIssuer::new("https://idp.local", jwks(), None, "idp");
        assert!(issuer.claim_rules().is_empty());
    }

    #[test]
    fn test_standard_with_audience() {
        let issuer = StandardIssuer::new("https://idp.local", jwks(), Some("api://x".into()), "idp");
        let rules = issuer.claim_rules();
        assert_eq!(rules.len(), 1);
        assert!(rules.contains(&ClaimRule::AudienceEquals("api://x".to_string())));
    }

    #[test]
    fn test_azure_minimal_only_audience() {
        let issuer = AzureIssuer::new("https://sts.windows.net/t/", jwks(), "api://x", "azure");
        let kinds: Vec<_> = issuer.claim_rules().iter().map(ClaimRule::kind).collect();
        assert_eq!(kinds, vec![RuleKind::AudienceEquals]);
    }

    #[test]
    fn test_azure_full() {
        let issuer = AzureIssuer::new("https://sts.windows.net/t/", jwks(), "api://x", "azure")
            .with_authorized_clients(["client-a"])
            .with_required_groups(["g1", "g2"])
            .with_required_roles(["r1"])
            .with_required_scopes(["s1"])
            .with_certificate_client_authentication(true);

        let rules = issuer.claim_rules();
        assert_eq!(rules.len(), 6);
        assert!(rules.contains(&AzureClaimRules::enforce_in_all_groups(["g2", "g1"])));
        assert!(rules.contains(&ClaimRule::CertificateClientAuthentication));
    }

    #[test]
    fn test_rules_are_independent() {
        let issuer = AzureIssuer::new("https://sts.windows.net/t/", jwks(), "api://x", "azure")
            .with_required_scopes(["s1"]);
        let kinds: BTreeSet<_> = issuer.claim_rules().iter().map(ClaimRule::kind).collect();
        assert_eq!(kinds, BTreeSet::from([RuleKind::AudienceEquals, RuleKind::HasAllScopes]));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let issuer: Issuer = AzureIssuer::new("https://sts.windows.net/t/", jwks(), "api://x", "azure")
            .with_required_roles(["r2", "r1"])
            .into();
        assert_eq!(issuer.claim_rules(), issuer.clone().claim_rules());
    }

    #[test]
    fn test_issuer_accessors() {
        let issuer: Issuer = AzureIssuer::new("https://sts.windows.net/t/", jwks(), "api://x", "azure").into();
        assert_eq!(issuer.issuer(), "https://sts.windows.net/t/");
        assert_eq!(issuer.alias(), "azure");
        assert_eq!(issuer.audience(), Some("api://x"));
        assert_eq!(issuer.jwks_uri(), &jwks());
    }
}
