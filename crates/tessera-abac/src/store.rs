//! Shared, concurrently readable policy store.
//!
//! The store holds an `Arc<Policy>` behind a `RwLock`. Evaluations take the
//! read lock only long enough to clone the `Arc` and then scan that snapshot
//! without holding any lock. Writers are serialized by the write lock and
//! copy-on-write the policy, so an in-flight evaluation keeps seeing the
//! complete rule sequence it started with.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::attributes::AttributeSet;
use crate::error::Result;
use crate::evaluator::{self, AccessRequest, Decision};
use crate::policy::{Effect, Policy, Rule, RuleId, RuleSpec};

/// Thread-safe policy store with snapshot reads and serialized writes.
#[derive(Debug)]
pub struct PolicyStore {
    policy: RwLock<Arc<Policy>>,
    /// Whether to log every evaluation.
    audit_enabled: bool,
}

impl PolicyStore {
    /// Creates an empty store. An empty store denies every request.
    pub fn new() -> Self {
        Self::from(Policy::new())
    }

    /// Disables per-evaluation audit logging.
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// Sets per-evaluation audit logging.
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    pub fn audit_enabled(&self) -> bool {
        self.audit_enabled
    }

    /// Returns the current rule sequence.
    ///
    /// The snapshot is immutable; later writes to the store are not visible
    /// through it.
    pub fn snapshot(&self) -> Arc<Policy> {
        // The lock only ever guards a whole `Arc` swap, so a poisoned lock
        // still holds a complete policy.
        let guard = self.policy.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Appends a rule to the end of the sequence and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`AbacError::InvalidRule`](crate::AbacError::InvalidRule) if
    /// `action` is empty. The store is unchanged on error.
    pub fn add_rule(
        &self,
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
    pub fn add(&self, spec: RuleSpec) -> Result<Rule> {
        // Validate before taking the write lock so rejected input never
        // triggers a copy of the policy.
        if let Err(e) = spec.validate() {
            warn!(error = %e, "Rule rejected");
            return Err(e);
        }

        let mut guard = self.policy.write().unwrap_or_else(PoisonError::into_inner);
        let rule = Arc::make_mut(&mut guard).add(spec)?;

        debug!(
            rule = %rule.id,
            action = %rule.action,
            effect = %rule.effect,
            rules = guard.len(),
            "Rule added"
        );
        Ok(rule)
    }

    /// Removes the rule with handle `id`, returning it.
    ///
    /// The relative order of the remaining rules is unchanged.
    pub fn remove_rule(&self, id: RuleId) -> Result<Rule> {
        let mut guard = self.policy.write().unwrap_or_else(PoisonError::into_inner);
        if guard.get(id).is_none() {
            warn!(rule = %id, "Removal of unknown rule");
        }
        let rule = Arc::make_mut(&mut guard).remove_rule(id)?;

        debug!(rule = %rule.id, rules = guard.len(), "Rule removed");
        Ok(rule)
    }

    /// Removes every rule.
    pub fn clear(&self) {
        let mut guard = self.policy.write().unwrap_or_else(PoisonError::into_inner);
        Arc::make_mut(&mut guard).clear();
        debug!("Policy cleared");
    }

    /// Evaluates a request against the current snapshot.
    ///
    /// See [`evaluator::evaluate`] for the matching algorithm.
    ///
    /// **Audit:** Logs every decision when auditing is enabled.
    pub fn evaluate(
        &self,
        subject: &AttributeSet,
        resource: &AttributeSet,
        action: &str,
    ) -> Result<Decision> {
        let snapshot = self.snapshot();
        let decision = evaluator::evaluate(&snapshot, subject, resource, action)
            .inspect_err(|e| warn!(error = %e, "Request rejected"))?;
        self.audit(action, &decision);
        Ok(decision)
    }

    /// Evaluates a boundary-form request against the current snapshot.
    pub fn evaluate_request(&self, request: &AccessRequest) -> Result<Decision> {
        let snapshot = self.snapshot();
        let decision = evaluator::evaluate_request(&snapshot, request)
            .inspect_err(|e| warn!(error = %e, "Request rejected"))?;
        self.audit(&request.action, &decision);
        Ok(decision)
    }

    fn audit(&self, action: &str, decision: &Decision) {
        if !self.audit_enabled {
            return;
        }

        let matched = decision
            .matched_rule
            .map_or_else(|| "default".to_string(), |id| id.to_string());
        if decision.is_allowed() {
            info!(
                action = %action,
                matched_rule = %matched,
                reason = %decision.reason,
                "Access allowed"
            );
        } else {
            warn!(
                action = %action,
                matched_rule = %matched,
                reason = %decision.reason,
                "Access denied"
            );
        }
    }
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Policy> for PolicyStore {
    fn from(policy: Policy) -> Self {
        Self {
            policy: RwLock::new(Arc::new(policy)),
            audit_enabled: true,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
