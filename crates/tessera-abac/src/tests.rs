//! Property and table tests for tessera-abac

use std::collections::BTreeMap;

use proptest::prelude::*;
use test_case::test_case;

use crate::{AttributeSet, Effect, Policy, PolicyStore, RuleSpec, evaluate, rule_matches};

// ============================================================================
// Strategies
// ============================================================================

fn attribute_set() -> impl Strategy<Value = AttributeSet> {
    prop::collection::btree_map("[a-z]{1,4}", "[a-z]{1,4}", 0..4).prop_map(AttributeSet::from)
}

fn effect() -> impl Strategy<Value = Effect> {
    prop_oneof![Just(Effect::Allow), Just(Effect::Deny)]
}

fn action_name() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

fn rule_spec() -> impl Strategy<Value = RuleSpec> {
    (attribute_set(), attribute_set(), action_name(), effect()).prop_map(
        |(subject, resource, action, effect)| {
            RuleSpec::new(action)
                .subject(subject)
                .resource(resource)
                .effect(effect)
        },
    )
}

fn policy_from(specs: Vec<RuleSpec>) -> Policy {
    let mut policy = Policy::new();
    for spec in specs {
        policy.add(spec).expect("generated specs have non-empty actions");
    }
    policy
}

/// Reference model: first rule in order that matches, else Deny.
fn first_match_model(policy: &Policy, s: &AttributeSet, r: &AttributeSet, a: &str) -> Effect {
    policy
        .rules()
        .iter()
        .find(|rule| {
            rule.action == a
                && rule.subject_requirements.iter().all(|(k, v)| s.get(k) == Some(v))
                && rule.resource_requirements.iter().all(|(k, v)| r.get(k) == Some(v))
        })
        .map_or(Effect::Deny, |rule| rule.effect)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: Evaluation agrees with the first-match reference model
    #[test]
    fn prop_matches_first_match_model(
        specs in prop::collection::vec(rule_spec(), 0..8),
        subject in attribute_set(),
        resource in attribute_set(),
        action in action_name(),
    ) {
        let policy = policy_from(specs);
        let decision = evaluate(&policy, &subject, &resource, &action).unwrap();
        prop_assert_eq!(
            decision.effect,
            first_match_model(&policy, &subject, &resource, &action)
        );
    }

    /// Property: A request whose action no rule governs is denied
    #[test]
    fn prop_unknown_action_default_deny(
        specs in prop::collection::vec(rule_spec(), 0..8),
        subject in attribute_set(),
        resource in attribute_set(),
    ) {
        let policy = policy_from(specs);
        // Generated actions are lowercase letters only.
        let decision = evaluate(&policy, &subject, &resource, "UNGOVERNED").unwrap();
        prop_assert_eq!(decision.effect, Effect::Deny);
        prop_assert!(decision.matched_rule.is_none());
    }

    /// Property: A rule never matches a different action, even with equal attributes
    #[test]
    fn prop_action_gate_is_exact(
        subject in attribute_set(),
        resource in attribute_set(),
        rule_action in action_name(),
        request_action in action_name(),
    ) {
        prop_assume!(rule_action != request_action);

        let policy = policy_from(vec![
            RuleSpec::new(rule_action).subject(subject.clone()).resource(resource.clone()),
        ]);
        let rule = &policy.rules()[0];

        prop_assert!(!rule_matches(rule, &subject, &resource, &request_action));
        prop_assert!(evaluate(&policy, &subject, &resource, &request_action).unwrap().is_denied());
    }

    /// Property: Extra request attributes never prevent a match
    #[test]
    fn prop_subset_match_ignores_extra_attributes(
        required in prop::collection::btree_map("[a-m]{1,3}", "[a-z]{1,3}", 0..4),
        extra in prop::collection::btree_map("[n-z]{1,3}", "[a-z]{1,3}", 0..4),
    ) {
        let requirements = AttributeSet::from(required.clone());
        let mut combined: BTreeMap<String, String> = required;
        combined.extend(extra);
        let subject = AttributeSet::from(combined);

        let policy = policy_from(vec![RuleSpec::new("read").subject(requirements)]);
        prop_assert!(evaluate(&policy, &subject, &AttributeSet::new(), "read").unwrap().is_allowed());
    }

    /// Property: Dropping or changing any required attribute prevents a match
    #[test]
    fn prop_subset_match_requires_every_key(
        required in prop::collection::btree_map("[a-z]{1,3}", "[a-z]{1,3}", 1..4),
        pick in any::<prop::sample::Index>(),
    ) {
        let requirements = AttributeSet::from(required.clone());
        let key = pick.get(&required.keys().cloned().collect::<Vec<_>>()).clone();

        let mut missing = required.clone();
        missing.remove(&key);
        let mut changed = required;
        changed.insert(key, "CHANGED".to_string());

        let rule_policy = policy_from(vec![RuleSpec::new("read").resource(requirements)]);
        let subject = AttributeSet::new();
        prop_assert!(evaluate(&rule_policy, &subject, &AttributeSet::from(missing), "read").unwrap().is_denied());
        prop_assert!(evaluate(&rule_policy, &subject, &AttributeSet::from(changed), "read").unwrap().is_denied());
    }

    /// Property: Among identical rules the earliest effect always decides
    #[test]
    fn prop_first_match_wins(
        requirements in attribute_set(),
        effects in prop::collection::vec(effect(), 1..6),
    ) {
        let specs = effects
            .iter()
            .map(|e| RuleSpec::new("read").subject(requirements.clone()).effect(*e))
            .collect();
        let policy = policy_from(specs);

        let decision = evaluate(&policy, &requirements, &AttributeSet::new(), "read").unwrap();
        prop_assert_eq!(decision.effect, effects[0]);
        prop_assert_eq!(decision.matched_rule, Some(policy.rules()[0].id));
    }

    /// Property: Repeated evaluation yields identical decisions
    #[test]
    fn prop_evaluation_is_idempotent(
        specs in prop::collection::vec(rule_spec(), 0..8),
        subject in attribute_set(),
        resource in attribute_set(),
        action in action_name(),
    ) {
        let store = PolicyStore::from(policy_from(specs)).without_audit();
        let before = store.snapshot();

        let first = store.evaluate(&subject, &resource, &action).unwrap();
        let second = store.evaluate(&subject, &resource, &action).unwrap();

        prop_assert_eq!(first, second);
        prop_assert!(std::sync::Arc::ptr_eq(&before, &store.snapshot()));
    }

    /// Property: Rules for disjoint actions do not affect each other
    #[test]
    fn prop_disjoint_actions_are_independent(
        a in rule_spec(),
        b in rule_spec(),
        subject in attribute_set(),
        resource in attribute_set(),
    ) {
        prop_assume!(a.action != b.action);

        let alone_a = policy_from(vec![a.clone()]);
        let alone_b = policy_from(vec![b.clone()]);
        let ab = policy_from(vec![a.clone(), b.clone()]);
        let ba = policy_from(vec![b.clone(), a.clone()]);

        for (alone, action) in [(&alone_a, &a.action), (&alone_b, &b.action)] {
            let expected = evaluate(alone, &subject, &resource, action).unwrap().effect;
            prop_assert_eq!(evaluate(&ab, &subject, &resource, action).unwrap().effect, expected);
            prop_assert_eq!(evaluate(&ba, &subject, &resource, action).unwrap().effect, expected);
        }
    }

    /// Property: Removing a rule keeps the others in their relative order
    #[test]
    fn prop_remove_preserves_order(
        specs in prop::collection::vec(rule_spec(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut policy = policy_from(specs);
        let ids: Vec<_> = policy.rules().iter().map(|r| r.id).collect();
        let victim = *pick.get(&ids);

        policy.remove_rule(victim).unwrap();

        let remaining: Vec<_> = policy.rules().iter().map(|r| r.id).collect();
        let expected: Vec<_> = ids.into_iter().filter(|id| *id != victim).collect();
        prop_assert_eq!(remaining, expected);
    }
}

// ============================================================================
// Reference Walkthrough
// ============================================================================

fn walkthrough_store() -> PolicyStore {
    let store = PolicyStore::new().without_audit();
    store
        .add_rule(
            AttributeSet::from([("role", "admin")]),
            AttributeSet::from([("type", "document")]),
            "read",
            Effect::Allow,
        )
        .unwrap();
    store
        .add_rule(
            AttributeSet::from([("role", "user"), ("department", "HR")]),
            AttributeSet::from([("type", "document"), ("classification", "public")]),
            "read",
            Effect::Allow,
        )
        .unwrap();
    store
}

#[test_case(&[("role", "admin")], &[("type", "document")], Effect::Allow; "admin reads document")]
#[test_case(
    &[("role", "user"), ("department", "HR")],
    &[("type", "document"), ("classification", "public")],
    Effect::Allow;
    "hr user reads public document"
)]
#[test_case(
    &[("role", "user"), ("department", "HR")],
    &[("type", "document"), ("classification", "private")],
    Effect::Deny;
    "hr user denied private document"
)]
#[test_case(&[("department", "IT")], &[("type", "document")], Effect::Deny; "missing role")]
#[test_case(&[("role", "user")], &[("type", "document")], Effect::Deny; "role mismatch")]
fn walkthrough_decisions(subject: &[(&str, &str)], resource: &[(&str, &str)], expected: Effect) {
    let store = walkthrough_store();
    let subject: AttributeSet = subject.iter().copied().collect();
    let resource: AttributeSet = resource.iter().copied().collect();

    let decision = store.evaluate(&subject, &resource, "read").unwrap();
    assert_eq!(decision.effect, expected);
}

#[test]
fn walkthrough_write_is_denied_for_admin() {
    let store = walkthrough_store();
    let decision = store
        .evaluate(
            &AttributeSet::from([("role", "admin")]),
            &AttributeSet::from([("type", "document")]),
            "write",
        )
        .unwrap();
    assert!(decision.is_denied());
}
