//! Shared proptest generators for issuers, policies and claim sets.

use dusseldorf_auth::{AzureIssuer, ClaimSet, Issuer, StandardIssuer};
use proptest::prelude::*;
use serde_json::{Map, Value, json};
use std::collections::BTreeSet;
use url::Url;

/// Generate short identifiers usable as group, role, scope or client ids.
pub fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{2,11}"
}

/// Generate a set of identifiers with at most `max` members.
pub fn identifier_set_strategy(max: usize) -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(identifier_strategy(), 0..=max)
}

/// Generate audience strings.
pub fn audience_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{2,15}".prop_map(|app| format!("api://{app}"))
}

#[allow(clippy::expect_used)]
fn jwks_uri(host: &str) -> Url {
    Url::parse(&format!("https://{host}.example.com/jwks")).expect("generated hosts are valid")
}

/// The configurable part of an Azure issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzurePolicy {
    /// Required audience
    pub audience: String,
    /// Accepted clients
    pub authorized_clients: BTreeSet<String>,
    /// Required groups
    pub required_groups: BTreeSet<String>,
    /// Required roles
    pub required_roles: BTreeSet<String>,
    /// Required scopes
    pub required_scopes: BTreeSet<String>,
    /// Require certificate client authentication
    pub require_certificate_client_authentication: bool,
}

impl AzurePolicy {
    /// Build the issuer enforcing this policy.
    #[must_use]
    pub fn issuer(&self) -> Issuer {
        AzureIssuer::new(
            "https://login.microsoftonline.com/tenant/v2.0",
            jwks_uri("login"),
            self.audience.clone(),
            "azure",
        )
        .with_authorized_clients(self.authorized_clients.iter().cloned())
        .with_required_groups(self.required_groups.iter().cloned())
        .with_required_roles(self.required_roles.iter().cloned())
        .with_required_scopes(self.required_scopes.iter().cloned())
        .with_certificate_client_authentication(self.require_certificate_client_authentication)
        .into()
    }

    /// The number of rules the issuer should derive.
    #[must_use]
    pub fn expected_rule_count(&self) -> usize {
        1 + usize::from(self.require_certificate_client_authentication)
            + usize::from(!self.authorized_clients.is_empty())
            + usize::from(!self.required_groups.is_empty())
            + usize::from(!self.required_roles.is_empty())
            + usize::from(!self.required_scopes.is_empty())
    }

    /// A claim set that satisfies every rule, plus `extra` members in each
    /// collection claim.
    #[must_use]
    pub fn satisfying_claims(&self, extra: &BTreeSet<String>) -> ClaimSet {
        let with_extra = |required: &BTreeSet<String>| -> Vec<String> {
            required.union(extra).cloned().collect()
        };
        let mut claims = Map::new();
        claims.insert("aud".to_string(), json!([self.audience, "api://other"]));
        claims.insert("groups".to_string(), json!(with_extra(&self.required_groups)));
        claims.insert("roles".to_string(), json!(with_extra(&self.required_roles)));
        claims.insert("scp".to_string(), json!(with_extra(&self.required_scopes).join(" ")));
        if let Some(client) = self.authorized_clients.iter().next() {
            claims.insert("azp".to_string(), json!(client));
        }
        if self.require_certificate_client_authentication {
            claims.insert("azpacr".to_string(), json!("2"));
        }
        ClaimSet::new(claims)
    }
}

/// Generate Azure policies.
pub fn azure_policy_strategy() -> impl Strategy<Value = AzurePolicy> {
    (
        audience_strategy(),
        identifier_set_strategy(3),
        identifier_set_strategy(4),
        identifier_set_strategy(4),
        identifier_set_strategy(4),
        any::<bool>(),
    )
        .prop_map(|(audience, clients, groups, roles, scopes, cert)| AzurePolicy {
            audience,
            authorized_clients: clients,
            required_groups: groups,
            required_roles: roles,
            required_scopes: scopes,
            require_certificate_client_authentication: cert,
        })
}

/// Generate standard issuers, with or without audience.
pub fn standard_issuer_strategy() -> impl Strategy<Value = Issuer> {
    ("[a-z]{3,10}", prop::option::of(audience_strategy())).prop_map(|(host, audience)| {
        StandardIssuer::new(format!("https://{host}.example.com"), jwks_uri(&host), audience, host)
            .into()
    })
}

/// Generate issuers of any family.
pub fn issuer_strategy() -> impl Strategy<Value = Issuer> {
    prop_oneof![
        standard_issuer_strategy(),
        azure_policy_strategy().prop_map(|policy| policy.issuer()),
    ]
}

fn claim_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        identifier_strategy().prop_map(Value::String),
        prop::collection::vec(identifier_strategy(), 0..4).prop_map(|v| json!(v)),
        any::<i64>().prop_map(|n| json!(n)),
        Just(Value::Null),
    ]
}

/// Generate arbitrary, possibly malformed, claim sets over the claims the
/// rules inspect.
pub fn claim_set_strategy() -> impl Strategy<Value = ClaimSet> {
    let names = prop_oneof![
        Just("aud"),
        Just("azp"),
        Just("appid"),
        Just("azpacr"),
        Just("groups"),
        Just("roles"),
        Just("scp"),
    ];
    prop::collection::vec((names, claim_value_strategy()), 0..8)
        .prop_map(|pairs| pairs.into_iter().collect())
}
