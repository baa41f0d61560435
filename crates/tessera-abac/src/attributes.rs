//! Attribute sets for ABAC evaluation.
//!
//! Subjects and resources are both described by an [`AttributeSet`]: a flat
//! map from attribute name to string value. Rules carry attribute sets too,
//! as *requirements* that a request's attributes must satisfy.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

// ============================================================================
// AttributeSet
// ============================================================================

/// An immutable mapping from attribute name to attribute value.
///
/// Keys are unique; inserting the same key twice through [`with`](Self::with)
/// keeps the last value. Iteration order is by key, which keeps audit output
/// and serialized forms stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet(BTreeMap<String, String>);

impl AttributeSet {
    /// Creates an empty attribute set.
    ///
    /// As a requirement set, an empty set matches every subject or resource.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns this set extended with `key = value` (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `true` if every requirement is present in `self` with an
    /// equal value.
    ///
    /// This is a subset test: attributes in `self` that are not named by
    /// `requirements` are ignored. A missing key or a different value is a
    /// mismatch, never an error. Comparison is exact and case-sensitive.
    pub fn satisfies(&self, requirements: &AttributeSet) -> bool {
        requirements
            .0
            .iter()
            .all(|(key, required)| self.0.get(key) == Some(required))
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for AttributeSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for AttributeSet {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
