//! Identifier types for the domain model
//!
//! All identifiers are deterministic: they derive from normalized content
//! (names, trigger events, requirement text), never from randomness, so two
//! pipeline runs on identical input always produce identical IDs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize a name for case-insensitive comparison: casefold and collapse
/// internal whitespace runs to a single space.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Reduce a name to a slug usable inside identifiers and artifact paths:
/// lowercase alphanumerics with single `-` separators.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Unique entity identifier, derived from the entity's normalized name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Derive the identifier for a (possibly unnormalized) entity name
    #[inline]
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self(format!("ent-{}", slugify(&normalize_name(name))))
    }

    /// Disambiguated identifier for distinct names that slugify identically
    /// (`foo bar` vs `foo-bar`)
    #[inline]
    #[must_use]
    pub fn from_name_indexed(name: &str, index: usize) -> Self {
        Self(format!("ent-{}-{}", slugify(&normalize_name(name)), index))
    }

    /// Identifier as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique workflow identifier, derived from the normalized trigger event
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkflowId(String);

impl WorkflowId {
    /// Derive the identifier for a trigger event
    #[inline]
    #[must_use]
    pub fn from_event(event: &str) -> Self {
        Self(format!("wf-{}", slugify(&normalize_name(event))))
    }

    /// Disambiguated identifier for repeated trigger events
    #[inline]
    #[must_use]
    pub fn from_event_indexed(event: &str, index: usize) -> Self {
        Self(format!("wf-{}-{}", slugify(&normalize_name(event)), index))
    }

    /// Identifier as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable requirement identifier
///
/// Primary form is `R-<8 hex chars>` from a blake3 hash of the normalized
/// requirement text. When two distinct requirements normalize to identical
/// text the colliding group falls back to `R-SEQ-<n>`, sequenced in original
/// source order (duplicates are kept, never merged).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequirementId(String);

impl RequirementId {
    /// Content-derived identifier from requirement text
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let digest = blake3::hash(normalize_name(text).as_bytes());
        let hex = digest.to_hex();
        Self(format!("R-{}", &hex.as_str()[..8]))
    }

    /// Sequence-fallback identifier for hash collisions
    #[inline]
    #[must_use]
    pub fn from_sequence(n: usize) -> Self {
        Self(format!("R-SEQ-{n:04}"))
    }

    /// Identifier as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique planned-task identifier, derived from task kind and subject
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    /// Create a task identifier from a kind label and subject slug
    #[inline]
    #[must_use]
    pub fn new(kind: &str, subject: &str) -> Self {
        Self(format!("{kind}:{subject}"))
    }

    /// Identifier as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
