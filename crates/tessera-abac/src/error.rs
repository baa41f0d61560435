//! Error types for policy construction and evaluation.

use thiserror::Error;

use crate::policy::RuleId;

/// Errors surfaced by the policy store and evaluator.
///
/// Every variant is a caller-correctable input problem. A well-formed request
/// that matches no rule is *not* an error: it evaluates to a `Deny` decision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbacError {
    /// A rule was rejected at insertion time. The store is left unchanged.
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// A request was malformed; no decision was produced.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No rule with this handle exists in the store.
    #[error("Rule not found: {0}")]
    RuleNotFound(RuleId),
}

/// Result type for ABAC operations.
pub type Result<T> = std::result::Result<T, AbacError>;
