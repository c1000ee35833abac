//! Applying an issuer's rule set to a verified claim set.

use crate::claims::ClaimSet;
use crate::issuer::{DeriveClaimRules, Issuer};
use crate::rule::{ClaimRules, RuleKind};
use dusseldorf_common::{InvalidParameter, ParameterType, ProblemDetails};

/// Outcome of evaluating a claim set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every rule held.
    Authorized,
    /// At least one rule failed.
    Unauthorized {
        /// Kinds of the failing rules; never claim values.
        failed: Vec<RuleKind>,
    },
}

impl Verdict {
    /// Whether the request may proceed.
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized)
    }

    /// Kinds of the failing rules, empty when authorized.
    #[must_use]
    pub fn failed_rules(&self) -> &[RuleKind] {
        match self {
            Self::Authorized => &[],
            Self::Unauthorized { failed } => failed,
        }
    }

    /// The 403 payload for an unauthorized verdict.
    #[must_use]
    pub fn to_problem_details(&self) -> Option<ProblemDetails> {
        match self {
            Self::Authorized => None,
            Self::Unauthorized { failed } => {
                let invalid_parameters = failed
                    .iter()
                    .map(|kind| InvalidParameter {
                        name: kind.claims().join("|"),
                        reason: format!("Token oppfyller ikke {kind}."),
                        parameter_type: ParameterType::Claim,
                        invalid_value: None,
                    })
                    .collect();
                Some(ProblemDetails {
                    invalid_parameters,
                    ..ProblemDetails::new(
                        "/problem-details/unauthorized",
                        "unauthorized",
                        403,
                        "Requesten er ikke autorisert.",
                    )
                })
            }
        }
    }
}

/// Evaluate `rules` against `claims`.
///
/// Every rule is evaluated so the verdict lists all failures. An empty rule
/// set always authorizes.
#[must_use]
pub fn evaluate(claims: &ClaimSet, rules: &ClaimRules) -> Verdict {
    let failed: Vec<RuleKind> = rules
        .iter()
        .filter(|rule| !rule.holds(claims))
        .map(|rule| rule.kind())
        .collect();

    if failed.is_empty() {
        Verdict::Authorized
    } else {
        Verdict::Unauthorized { failed }
    }
}

/// Evaluator bound to one issuer's rules, derived once.
///
/// Immutable after construction and safe to share across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRuleEvaluator {
    issuer: String,
    rules: ClaimRules,
}

impl ClaimRuleEvaluator {
    /// Bind a pre-built rule set.
    #[must_use]
    pub fn new(issuer: impl Into<String>, rules: ClaimRules) -> Self {
        Self {
            issuer: issuer.into(),
            rules,
        }
    }

    /// Derive the rules from an issuer.
    #[must_use]
    pub fn for_issuer(issuer: &Issuer) -> Self {
        Self::new(issuer.issuer(), issuer.claim_rules())
    }

    /// The rules applied.
    #[must_use]
    pub const fn rules(&self) -> &ClaimRules {
        &self.rules
    }

    /// Evaluate a claim set, logging the failing rule kinds.
    #[must_use]
    pub fn evaluate(&self, claims: &ClaimSet) -> Verdict {
        let verdict = evaluate(claims, &self.rules);
        if let Verdict::Unauthorized { failed } = &verdict {
            tracing::warn!(
                issuer = %self.issuer,
                failed = ?failed.iter().map(RuleKind::as_str).collect::<Vec<_>>(),
                "token does not satisfy issuer policy"
            );
        }
        verdict
    }
}
