//! Property-based tests for issuer rule derivation and evaluation.

use dusseldorf_auth::{
    ClaimRuleEvaluator, ClaimRules, ClaimSet, DeriveClaimRules, Verdict, evaluate,
};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeSet;
use test_utils::{
    azure_policy_strategy, claim_set_strategy, identifier_set_strategy, issuer_strategy,
};

// Property: derivation is deterministic. Two derivations from equal
// configurations yield equal rule sets.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_derivation_is_deterministic(issuer in issuer_strategy()) {
        let copy = issuer.clone();
        prop_assert_eq!(issuer.claim_rules(), copy.claim_rules());
        prop_assert_eq!(issuer.claim_rules(), issuer.claim_rules());
    }

    #[test]
    fn prop_azure_emits_one_rule_per_configured_policy(policy in azure_policy_strategy()) {
        prop_assert_eq!(policy.issuer().claim_rules().len(), policy.expected_rule_count());
    }
}

// Property: the verdict is the logical AND of the individual rule outcomes,
// and evaluation never fails on malformed claims.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_verdict_is_conjunction(
        issuer in issuer_strategy(),
        claims in claim_set_strategy(),
    ) {
        let rules = issuer.claim_rules();
        let verdict = evaluate(&claims, &rules);
        let all_hold = rules.iter().all(|rule| rule.holds(&claims));

        prop_assert_eq!(verdict.is_authorized(), all_hold);

        let expected_failed: Vec<_> = rules
            .iter()
            .filter(|rule| !rule.holds(&claims))
            .map(dusseldorf_auth::ClaimRule::kind)
            .collect();
        prop_assert_eq!(verdict.failed_rules(), expected_failed.as_slice());
    }

    #[test]
    fn prop_empty_rule_set_always_authorizes(claims in claim_set_strategy()) {
        prop_assert_eq!(evaluate(&claims, &ClaimRules::new()), Verdict::Authorized);
    }

    #[test]
    fn prop_satisfying_claims_are_authorized(
        policy in azure_policy_strategy(),
        extra in identifier_set_strategy(3),
    ) {
        let evaluator = ClaimRuleEvaluator::for_issuer(&policy.issuer());
        let claims = policy.satisfying_claims(&extra);
        prop_assert!(evaluator.evaluate(&claims).is_authorized());
    }

    #[test]
    fn prop_dropping_a_required_group_is_unauthorized(
        policy in azure_policy_strategy().prop_filter("needs groups", |p| !p.required_groups.is_empty()),
    ) {
        let evaluator = ClaimRuleEvaluator::for_issuer(&policy.issuer());
        let claims = policy.satisfying_claims(&BTreeSet::new());

        let mut groups: Vec<_> = policy.required_groups.iter().cloned().collect();
        groups.pop();
        let mut value = serde_json::to_value(&claims).unwrap_or_default();
        value["groups"] = json!(groups);

        let verdict = evaluator.evaluate(&ClaimSet::from_value(value));
        prop_assert!(!verdict.is_authorized());
        prop_assert_eq!(verdict.failed_rules(), &[dusseldorf_auth::RuleKind::InAllGroups]);
    }
}
