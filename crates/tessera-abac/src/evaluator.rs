//! ABAC policy evaluation engine.
//!
//! Evaluates access requests against a policy by scanning rules in insertion
//! order. The first matching rule wins. If no rule matches, access is denied.

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeSet;
use crate::error::{AbacError, Result};
use crate::policy::{Effect, Policy, Rule, RuleId};

// ============================================================================
// Decision
// ============================================================================

/// The result of evaluating an access request against a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Whether access is allowed or denied.
    pub effect: Effect,
    /// The rule that matched, or `None` if the default deny was applied.
    pub matched_rule: Option<RuleId>,
    /// Human-readable explanation of why this decision was made.
    pub reason: String,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        self.effect == Effect::Allow
    }

    pub fn is_denied(&self) -> bool {
        self.effect == Effect::Deny
    }

    fn matched(rule: &Rule, index: usize) -> Self {
        Self {
            effect: rule.effect,
            matched_rule: Some(rule.id),
            reason: format!(
                "Matched {} at position {index} (action '{}', effect {})",
                rule.id, rule.action, rule.effect
            ),
        }
    }

    fn default_deny() -> Self {
        Self {
            effect: Effect::Deny,
            matched_rule: None,
            reason: "No rule matched; default deny".to_string(),
        }
    }
}

// ============================================================================
// AccessRequest
// ============================================================================

/// A request as it arrives from outside the process, before validation.
///
/// Deserializers leave a missing attribute set as `None`;
/// [`evaluate_request`] rejects it instead of treating it as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    #[serde(default)]
    pub subject: Option<AttributeSet>,
    #[serde(default)]
    pub resource: Option<AttributeSet>,
    #[serde(default)]
    pub action: String,
}

impl AccessRequest {
    pub fn new(subject: AttributeSet, resource: AttributeSet, action: impl Into<String>) -> Self {
        Self {
            subject: Some(subject),
            resource: Some(resource),
            action: action.into(),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Evaluates an access request against a policy.
///
/// Rules are scanned in insertion order. The first rule whose action equals
/// `action` and whose subject and resource requirements are satisfied decides
/// the outcome; later rules are never consulted, however specific. If no rule
/// matches, the decision is `Deny`.
///
/// Evaluation is a pure read: neither the policy nor the attribute sets are
/// modified.
///
/// # Errors
///
/// Returns [`AbacError::InvalidRequest`] if `action` is empty.
pub fn evaluate(
    policy: &Policy,
    subject: &AttributeSet,
    resource: &AttributeSet,
    action: &str,
) -> Result<Decision> {
    if action.is_empty() {
        return Err(AbacError::InvalidRequest(
            "action must be a non-empty string".to_string(),
        ));
    }

    let decision = policy
        .rules()
        .iter()
        .enumerate()
        .find(|(_, rule)| rule_matches(rule, subject, resource, action))
        .map_or_else(Decision::default_deny, |(index, rule)| {
            Decision::matched(rule, index)
        });

    Ok(decision)
}

/// Evaluates a boundary-form [`AccessRequest`].
///
/// # Errors
///
/// Returns [`AbacError::InvalidRequest`] if either attribute set is absent or
/// the action is empty.
pub fn evaluate_request(policy: &Policy, request: &AccessRequest) -> Result<Decision> {
    let subject = request
        .subject
        .as_ref()
        .ok_or_else(|| AbacError::InvalidRequest("subject attributes are missing".to_string()))?;
    let resource = request
        .resource
        .as_ref()
        .ok_or_else(|| AbacError::InvalidRequest("resource attributes are missing".to_string()))?;

    evaluate(policy, subject, resource, &request.action)
}

/// Returns `true` if `rule` applies to the request.
///
/// The action must match exactly (case-sensitive, no wildcards), and both
/// requirement sets must be subsets of the corresponding request attributes.
pub fn rule_matches(
    rule: &Rule,
    subject: &AttributeSet,
    resource: &AttributeSet,
    action: &str,
) -> bool {
    rule.action == action
        && subject.satisfies(&rule.subject_requirements)
        && resource.satisfies(&rule.resource_requirements)
}

// ============================================================================
// Tests
// ============================================================================
