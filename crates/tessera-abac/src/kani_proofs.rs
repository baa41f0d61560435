//! Kani proofs for ABAC policy evaluation
//!
//! These proofs verify correctness properties of the evaluator using bounded
//! model checking.
//!
//! Run with: `cargo kani --harness verify_*`

use crate::attributes::AttributeSet;
use crate::evaluator;
use crate::policy::{Effect, Policy, RuleSpec};

fn effect_from(flag: bool) -> Effect {
    if flag { Effect::Allow } else { Effect::Deny }
}

/// Policy evaluation determinism
///
/// **Property**: Same inputs always produce the same decision
#[kani::proof]
#[kani::unwind(6)]
fn verify_policy_evaluation_determinism() {
    let mut policy = Policy::new();
    policy
        .add(RuleSpec::new("read").subject(AttributeSet::new().with("role", "admin")))
        .unwrap();

    let subject = AttributeSet::new().with("role", "admin");
    let resource = AttributeSet::new().with("type", "document");

    let decision1 = evaluator::evaluate(&policy, &subject, &resource, "read").unwrap();
    let decision2 = evaluator::evaluate(&policy, &subject, &resource, "read").unwrap();

    assert_eq!(decision1.effect, decision2.effect);
    assert_eq!(decision1.matched_rule, decision2.matched_rule);
}

/// First-match conflict resolution
///
/// **Property**: When two rules match, the earlier one decides regardless
/// of either effect
#[kani::proof]
#[kani::unwind(6)]
fn verify_first_match_wins() {
    let first: bool = kani::any();
    let second: bool = kani::any();

    let mut policy = Policy::new();
    let winner = policy
        .add(RuleSpec::new("read").effect(effect_from(first)))
        .unwrap();
    policy
        .add(RuleSpec::new("read").effect(effect_from(second)))
        .unwrap();

    let decision =
        evaluator::evaluate(&policy, &AttributeSet::new(), &AttributeSet::new(), "read").unwrap();

    assert_eq!(decision.effect, effect_from(first));
    assert_eq!(decision.matched_rule, Some(winner.id));
}

/// Default deny safety
///
/// **Property**: When no rule matches, access is denied and no rule is
/// reported
#[kani::proof]
#[kani::unwind(6)]
fn verify_default_deny_safety() {
    let effect = effect_from(kani::any());

    let mut policy = Policy::new();
    policy
        .add(
            RuleSpec::new("read")
                .subject(AttributeSet::new().with("role", "admin"))
                .effect(effect),
        )
        .unwrap();

    let subject = AttributeSet::new().with("role", "user");
    let decision =
        evaluator::evaluate(&policy, &subject, &AttributeSet::new(), "read").unwrap();

    assert_eq!(decision.effect, Effect::Deny);
    assert!(decision.matched_rule.is_none());
}
