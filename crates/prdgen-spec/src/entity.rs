//! Entities and their field declarations

use crate::ids::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Field type marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// Free-form text; the extractor's only default for unannotated fields
    Text,
    /// Opaque unique identifier, used by synthesized `id` fields
    Opaque,
    /// Type annotation carried verbatim from the PRD (`email: string`)
    Declared(String),
}

/// A single declared or synthesized entity field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name
    pub name: String,
    /// Field type marker
    pub ty: FieldType,
    /// Free-form constraints (`unique`, `pk`, ...)
    pub constraints: Vec<String>,
}

impl FieldSpec {
    /// Untyped field, as extracted from a bare field name
    #[inline]
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: FieldType::Text,
            constraints: Vec::new(),
        }
    }

    /// Field with an explicit type annotation
    #[inline]
    #[must_use]
    pub fn declared(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: FieldType::Declared(ty.into()),
            constraints: Vec::new(),
        }
    }

    /// The default unique identifier field appended by enrichment
    #[inline]
    #[must_use]
    pub fn default_id() -> Self {
        Self {
            name: "id".to_string(),
            ty: FieldType::Opaque,
            constraints: vec!["unique".to_string()],
        }
    }
}

/// A canonical entity in a frozen spec
///
/// Created explicitly from `Entity:` directives or synthesized as a stub by
/// the enricher (`inferred = true`). Never deleted once declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Deterministic identifier derived from the normalized name
    pub id: EntityId,
    /// Declared name (first-seen spelling among duplicate declarations)
    pub name: String,
    /// Ordered field list; union of all duplicate declarations
    pub fields: Vec<FieldSpec>,
    /// Free-text description accumulated from trailing prose lines
    pub description: String,
    /// True when the entity was synthesized by a default rule
    pub inferred: bool,
    /// PRD line numbers this entity was declared or referenced on
    pub source_lines: BTreeSet<u32>,
}

impl Entity {
    /// Whether this entity declares a field with the given name
    #[inline]
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name.eq_ignore_ascii_case(name))
    }
}
