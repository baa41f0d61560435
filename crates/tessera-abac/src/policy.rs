//! ABAC policy definitions.
//!
//! A [`Policy`] is an ordered sequence of [`Rule`]s. Order is the only
//! precedence there is: rules are evaluated in insertion order and the first
//! matching rule determines the outcome. Overlapping or contradictory rules
//! are accepted at insertion time and resolved by position at evaluation time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeSet;
use crate::error::{AbacError, Result};

// ============================================================================
// Effect
// ============================================================================

/// The effect of a policy rule: allow or deny access.
///
/// There is deliberately no `Default` impl. The caller-facing default of
/// `Allow` lives in [`RuleSpec::new`]; the evaluator's no-match outcome is
/// always `Deny`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Grant access.
    Allow,
    /// Deny access.
    Deny,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("allow"),
            Self::Deny => f.write_str("deny"),
        }
    }
}

// ============================================================================
// RuleId
// ============================================================================

/// Opaque handle for a rule, assigned by the policy at insertion time.
///
/// Handles increase monotonically and are never reused within one policy,
/// so a removed rule's handle cannot later refer to a different rule. A
/// handle says nothing about precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(u64);

impl RuleId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule#{}", self.0)
    }
}

// ============================================================================
// RuleSpec
// ============================================================================

/// A caller-supplied rule description that has not been validated yet.
///
/// `RuleSpec::new` resolves the caller-facing defaults: `Allow` effect and
/// empty (match-anything) requirement sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Attributes the subject must carry.
    #[serde(default, rename = "subject")]
    pub subject_requirements: AttributeSet,
    /// Attributes the resource must carry.
    #[serde(default, rename = "resource")]
    pub resource_requirements: AttributeSet,
    /// The exact action this rule governs.
    pub action: String,
    /// The effect when this rule matches.
    #[serde(default = "default_effect")]
    pub effect: Effect,
}

fn default_effect() -> Effect {
    Effect::Allow
}

impl RuleSpec {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            subject_requirements: AttributeSet::new(),
            resource_requirements: AttributeSet::new(),
            action: action.into(),
            effect: default_effect(),
        }
    }

    /// Sets the subject requirements.
    pub fn subject(mut self, requirements: impl Into<AttributeSet>) -> Self {
        self.subject_requirements = requirements.into();
        self
    }

    /// Sets the resource requirements.
    pub fn resource(mut self, requirements: impl Into<AttributeSet>) -> Self {
        self.resource_requirements = requirements.into();
        self
    }

    pub fn effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }

    /// Shorthand for `.effect(Effect::Deny)`.
    pub fn deny(self) -> Self {
        self.effect(Effect::Deny)
    }

    /// Checks the rule invariants: the action must be non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.action.is_empty() {
            return Err(AbacError::InvalidRule(
                "action must be a non-empty string".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Rule
// ============================================================================

/// A single validated policy statement.
///
/// Rules are only handed out by [`Policy::add_rule`] (or the store wrapping a
/// policy), so every `Rule` has a non-empty action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Handle assigned at insertion.
    pub id: RuleId,
    /// Attributes the subject must carry (subset match).
    pub subject_requirements: AttributeSet,
    /// Attributes the resource must carry (subset match).
    pub resource_requirements: AttributeSet,
    /// The exact, case-sensitive action this rule governs.
    pub action: String,
    /// The effect when this rule is the first match.
    pub effect: Effect,
}

// ============================================================================
// Policy
// ============================================================================

/// An ordered sequence of rules with single-owner mutation.
///
/// For shared, concurrently evaluated rule sets wrap a policy in a
/// [`PolicyStore`](crate::store::PolicyStore).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Policy {
    rules: Vec<Rule>,
    #[serde(skip)]
    next_id: u64,
}

impl Policy {
    /// Creates an empty policy. An empty policy denies every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule to the end of the sequence and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`AbacError::InvalidRule`] if `action` is empty. The policy is
    /// unchanged on error.
    pub fn add_rule(
        &mut self,
        subject_requirements: AttributeSet,
        resource_requirements: AttributeSet,
        action: impl Into<String>,
        effect: Effect,
    ) -> Result<Rule> {
        self.add(RuleSpec {
            subject_requirements,
            resource_requirements,
            action: action.into(),
            effect,
        })
    }

    /// Validates `spec` and appends it as a new rule.
    pub fn add(&mut self, spec: RuleSpec) -> Result<Rule> {
        spec.validate()?;

        let rule = Rule {
            id: RuleId(self.next_id),
            subject_requirements: spec.subject_requirements,
            resource_requirements: spec.resource_requirements,
            action: spec.action,
            effect: spec.effect,
        };
        self.next_id += 1;
        self.rules.push(rule.clone());
        Ok(rule)
    }

    /// Appends a rule (builder pattern).
    pub fn with_rule(mut self, spec: RuleSpec) -> Result<Self> {
        self.add(spec)?;
        Ok(self)
    }

    /// Removes the rule with handle `id`, returning it.
    ///
    /// The relative order of the remaining rules is unchanged.
    pub fn remove_rule(&mut self, id: RuleId) -> Result<Rule> {
        let index = self
            .rules
            .iter()
            .position(|r| r.id == id)
            .ok_or(AbacError::RuleNotFound(id))?;
        Ok(self.rules.remove(index))
    }

    /// Removes every rule. Handles are not reused afterwards.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Returns the rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
