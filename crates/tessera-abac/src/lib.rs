//! # tessera-abac: Attribute-Based Access Control
//!
//! Decides whether a subject may perform an action on a resource by
//! consulting an ordered set of declarative rules.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Access Request                              │
//! │  (Subject + Resource Attributes, Action)     │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  PolicyStore (snapshot of ordered rules)     │
//! │  ├─ Scan rules in insertion order            │
//! │  ├─ Exact action gate                        │
//! │  ├─ Subset match on subject and resource     │
//! │  └─ First match wins, otherwise deny         │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Decision                                    │
//! │  - Effect (Allow/Deny)                       │
//! │  - Matched rule handle                       │
//! │  - Human-readable reason                     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Conflict Resolution
//!
//! Precedence is rule order and nothing else. Two rules with identical
//! requirements and action but different effects are both accepted; the one
//! added first decides every request they both match. There is no
//! most-specific-wins or deny-overrides step, and no matching rule means
//! `Deny`.
//!
//! ## Examples
//!
//! ```
//! use tessera_abac::{AttributeSet, Effect, PolicyStore};
//!
//! let store = PolicyStore::new();
//! store.add_rule(
//!     AttributeSet::from([("role", "admin")]),
//!     AttributeSet::from([("type", "document")]),
//!     "read",
//!     Effect::Allow,
//! )?;
//!
//! let subject = AttributeSet::from([("role", "admin"), ("department", "IT")]);
//! let resource = AttributeSet::from([("type", "document")]);
//!
//! assert!(store.evaluate(&subject, &resource, "read")?.is_allowed());
//! assert!(store.evaluate(&subject, &resource, "delete")?.is_denied());
//! # Ok::<(), tessera_abac::AbacError>(())
//! ```

pub mod attributes;
pub mod error;
pub mod evaluator;
pub mod policy;
pub mod store;

// Kani proofs for bounded model checking
#[cfg(kani)]
mod kani_proofs;

#[cfg(test)]
mod tests;

pub use attributes::AttributeSet;
pub use error::{AbacError, Result};
pub use evaluator::{AccessRequest, Decision, evaluate, evaluate_request, rule_matches};
pub use policy::{Effect, Policy, Rule, RuleId, RuleSpec};
pub use store::PolicyStore;
