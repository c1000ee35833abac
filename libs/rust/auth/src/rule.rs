//! Claim rules: pure predicates over a [`ClaimSet`].
//!
//! Rules are plain values. Two rules are equal when their kind and
//! parameters are equal, so a [`ClaimRules`] set deduplicates them.

use crate::claims::{ClaimName, ClaimSet};
use std::collections::BTreeSet;
use std::fmt;

/// The rule set an issuer requires. Rules are combined with logical AND.
pub type ClaimRules = BTreeSet<ClaimRule>;

/// Authentication method value for certificate-bound client credentials.
pub const CERTIFICATE_CLIENT_AUTHENTICATION: &str = "2";

/// A single named predicate over a claim set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClaimRule {
    /// `aud` equals, or contains, the configured audience.
    AudienceEquals(String),
    /// The client authenticated with a certificate.
    CertificateClientAuthentication,
    /// `azp` (or `appid`) is one of the configured clients.
    AuthorizedClient(BTreeSet<String>),
    /// `groups` contains every configured group.
    InAllGroups(BTreeSet<String>),
    /// `roles` contains every configured role.
    HasAllRoles(BTreeSet<String>),
    /// `scp` contains every configured scope.
    HasAllScopes(BTreeSet<String>),
}

/// Identifier of a rule's check, safe to log and return to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    /// See [`ClaimRule::AudienceEquals`]
    AudienceEquals,
    /// See [`ClaimRule::CertificateClientAuthentication`]
    CertificateClientAuthentication,
    /// See [`ClaimRule::AuthorizedClient`]
    AuthorizedClient,
    /// See [`ClaimRule::InAllGroups`]
    InAllGroups,
    /// See [`ClaimRule::HasAllRoles`]
    HasAllRoles,
    /// See [`ClaimRule::HasAllScopes`]
    HasAllScopes,
}

impl RuleKind {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AudienceEquals => "enforce_audience_equals",
            Self::CertificateClientAuthentication => "enforce_certificate_client_authentication",
            Self::AuthorizedClient => "enforce_authorized_client",
            Self::InAllGroups => "enforce_in_all_groups",
            Self::HasAllRoles => "enforce_has_all_roles",
            Self::HasAllScopes => "enforce_has_all_scopes",
        }
    }

    /// The claims the rule inspects, in lookup order.
    ///
    /// Client rules read the v2 claim and fall back to its v1 name.
    #[must_use]
    pub const fn claims(&self) -> &'static [&'static str] {
        match self {
            Self::AudienceEquals => &[ClaimName::AUD],
            Self::CertificateClientAuthentication => &[ClaimName::AZPACR, ClaimName::APPIDACR],
            Self::AuthorizedClient => &[ClaimName::AZP, ClaimName::APPID],
            Self::InAllGroups => &[ClaimName::GROUPS],
            Self::HasAllRoles => &[ClaimName::ROLES],
            Self::HasAllScopes => &[ClaimName::SCP],
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ClaimRule {
    /// The kind of check, without parameters.
    #[must_use]
    pub const fn kind(&self) -> RuleKind {
        match self {
            Self::AudienceEquals(_) => RuleKind::AudienceEquals,
            Self::CertificateClientAuthentication => RuleKind::CertificateClientAuthentication,
            Self::AuthorizedClient(_) => RuleKind::AuthorizedClient,
            Self::InAllGroups(_) => RuleKind::InAllGroups,
            Self::HasAllRoles(_) => RuleKind::HasAllRoles,
            Self::HasAllScopes(_) => RuleKind::HasAllScopes,
        }
    }

    /// Evaluate the rule. Missing or malformed claims fail the rule.
    #[must_use]
    pub fn holds(&self, claims: &ClaimSet) -> bool {
        match self {
            Self::AudienceEquals(audience) => claims
                .strings(ClaimName::AUD)
                .is_some_and(|aud| aud.contains(audience.as_str())),
            Self::CertificateClientAuthentication => claims
                .first_string(RuleKind::CertificateClientAuthentication.claims())
                .is_some_and(|method| method == CERTIFICATE_CLIENT_AUTHENTICATION),
            Self::AuthorizedClient(clients) => claims
                .first_string(RuleKind::AuthorizedClient.claims())
                .is_some_and(|client| clients.contains(client)),
            Self::InAllGroups(required) => contains_all(claims.strings(ClaimName::GROUPS), required),
            Self::HasAllRoles(required) => contains_all(claims.strings(ClaimName::ROLES), required),
            Self::HasAllScopes(required) => contains_all(claims.delimited(ClaimName::SCP), required),
        }
    }
}

fn contains_all(present: Option<BTreeSet<&str>>, required: &BTreeSet<String>) -> bool {
    present.is_some_and(|present| required.iter().all(|r| present.contains(r.as_str())))
}

fn owned_set<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

/// Rules every issuer family can require.
pub struct StandardClaimRules;

impl StandardClaimRules {
    /// `aud` must equal `audience`.
    #[must_use]
    pub fn enforce_audience_equals(audience: impl Into<String>) -> ClaimRule {
        ClaimRule::AudienceEquals(audience.into())
    }
}

/// Rules specific to Azure AD issued tokens.
pub struct AzureClaimRules;

impl AzureClaimRules {
    /// Client must have authenticated with a certificate.
    #[must_use]
    pub const fn enforce_certificate_client_authentication() -> ClaimRule {
        ClaimRule::CertificateClientAuthentication
    }

    /// Client must be one of `clients`.
    #[must_use]
    pub fn enforce_authorized_client<I, S>(clients: I) -> ClaimRule
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ClaimRule::AuthorizedClient(owned_set(clients))
    }

    /// Subject must be in every group.
    #[must_use]
    pub fn enforce_in_all_groups<I, S>(groups: I) -> ClaimRule
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ClaimRule::InAllGroups(owned_set(groups))
    }

    /// Token must carry every role.
    #[must_use]
    pub fn enforce_has_all_roles<I, S>(roles: I) -> ClaimRule
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ClaimRule::HasAllRoles(owned_set(roles))
    }

    /// Token must carry every scope.
    #[must_use]
    pub fn enforce_has_all_scopes<I, S>(scopes: I) -> ClaimRule
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ClaimRule::HasAllScopes(owned_set(scopes))
    }
}
