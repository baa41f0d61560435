#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tessera_abac::{
    AbacError, AttributeSet, Decision, Effect, PolicyStore, RuleSpec, rule_matches,
};

// ============================================================================
// Arbitrary Implementations
// ============================================================================

/// Fuzzer-friendly Effect with Arbitrary derivation.
#[derive(Debug, Clone, Copy, Arbitrary)]
enum FuzzEffect {
    Allow,
    Deny,
}

impl From<FuzzEffect> for Effect {
    fn from(f: FuzzEffect) -> Self {
        match f {
            FuzzEffect::Allow => Effect::Allow,
            FuzzEffect::Deny => Effect::Deny,
        }
    }
}

/// Fuzzer-friendly rule. Empty actions are generated on purpose.
#[derive(Debug, Clone, Arbitrary)]
struct FuzzRule {
    subject: Vec<(String, String)>,
    resource: Vec<(String, String)>,
    action: String,
    effect: FuzzEffect,
}

impl FuzzRule {
    fn to_spec(&self) -> RuleSpec {
        RuleSpec::new(self.action.clone())
            .subject(self.subject.iter().cloned().collect::<AttributeSet>())
            .resource(self.resource.iter().cloned().collect::<AttributeSet>())
            .effect(self.effect.into())
    }
}

#[derive(Debug, Clone, Arbitrary)]
struct FuzzRequest {
    subject: Vec<(String, String)>,
    resource: Vec<(String, String)>,
    action: String,
}

fuzz_target!(|input: (Vec<FuzzRule>, FuzzRequest)| {
    let (rules, request) = input;

    let store = PolicyStore::new().without_audit();
    for rule in &rules {
        let before = store.len();
        match store.add(rule.to_spec()) {
            Ok(_) => assert_eq!(store.len(), before + 1),
            Err(AbacError::InvalidRule(_)) => {
                assert!(rule.action.is_empty(), "only empty actions may be rejected");
                assert_eq!(store.len(), before, "rejected rule must not be appended");
            }
            Err(e) => panic!("unexpected error from add: {e}"),
        }
    }

    let subject: AttributeSet = request.subject.into_iter().collect();
    let resource: AttributeSet = request.resource.into_iter().collect();

    match store.evaluate(&subject, &resource, &request.action) {
        Ok(decision) => {
            assert!(!request.action.is_empty());
            validate_abac_invariants(&store, &subject, &resource, &request.action, &decision);
        }
        Err(AbacError::InvalidRequest(_)) => assert!(request.action.is_empty()),
        Err(e) => panic!("unexpected error from evaluate: {e}"),
    }
});

/// Validates evaluator invariants.
///
/// **Invariants checked:**
/// 1. The decision matches the first matching rule in insertion order
/// 2. Default deny: no matching rule means Deny with no matched rule
/// 3. Decision has a reason (for audit trail)
/// 4. Evaluation is idempotent
fn validate_abac_invariants(
    store: &PolicyStore,
    subject: &AttributeSet,
    resource: &AttributeSet,
    action: &str,
    decision: &Decision,
) {
    let snapshot = store.snapshot();
    let first = snapshot
        .rules()
        .iter()
        .find(|r| rule_matches(r, subject, resource, action));

    match first {
        Some(rule) => {
            assert_eq!(decision.matched_rule, Some(rule.id));
            assert_eq!(decision.effect, rule.effect);
        }
        None => {
            assert!(decision.matched_rule.is_none());
            assert_eq!(decision.effect, Effect::Deny, "no match must deny");
        }
    }

    assert!(
        !decision.reason.is_empty(),
        "decision must have a non-empty reason for audit logging"
    );

    let again = store
        .evaluate(subject, resource, action)
        .expect("second evaluation of a valid request");
    assert_eq!(&again, decision);
}
