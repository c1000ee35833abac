//! Verified claim sets.
//!
//! A [`ClaimSet`] is what the token-verification layer hands over after
//! signature and expiry checks. Accessors never fail: a claim with the wrong
//! shape reads as absent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Claim names inspected by the rules in this crate.
pub struct ClaimName;

impl ClaimName {
    /// Issuer
    pub const ISS: &'static str = "iss";
    /// Audience, a string or an array of strings
    pub const AUD: &'static str = "aud";
    /// Authorized party (v2 tokens)
    pub const AZP: &'static str = "azp";
    /// Application id (v1 tokens)
    pub const APPID: &'static str = "appid";
    /// Authorized party authentication method (v2 tokens)
    pub const AZPACR: &'static str = "azpacr";
    /// Application authentication method (v1 tokens)
    pub const APPIDACR: &'static str = "appidacr";
    /// Group object ids
    pub const GROUPS: &'static str = "groups";
    /// Application roles
    pub const ROLES: &'static str = "roles";
    /// Delegated scopes, space-delimited
    pub const SCP: &'static str = "scp";
}

/// A verified set of token claims.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    /// Wrap a claim map.
    #[must_use]
    pub const fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// Build from a JSON value; anything but an object yields an empty set.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(claims) => Self(claims),
            _ => Self::default(),
        }
    }

    /// Raw claim value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether the claim is present at all.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// A scalar string claim.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// The first present scalar string among `names`.
    #[must_use]
    pub fn first_string(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.string(name))
    }

    /// A collection-valued claim: a single string or an array of strings.
    ///
    /// An array holding anything other than strings is malformed and reads
    /// as absent.
    #[must_use]
    pub fn strings(&self, name: &str) -> Option<BTreeSet<&str>> {
        match self.get(name)? {
            Value::String(single) => Some(BTreeSet::from([single.as_str()])),
            Value::Array(values) => values.iter().map(Value::as_str).collect(),
            _ => None,
        }
    }

    /// Like [`strings`](Self::strings), but a scalar is split on whitespace.
    #[must_use]
    pub fn delimited(&self, name: &str) -> Option<BTreeSet<&str>> {
        match self.get(name)? {
            Value::String(joined) => Some(joined.split_whitespace().collect()),
            _ => self.strings(name),
        }
    }

    /// Number of claims.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no claims.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for ClaimSet {
    fn from(claims: Map<String, Value>) -> Self {
        Self(claims)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
