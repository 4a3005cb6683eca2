//! Raw intermediate representation
//!
//! Unmerged, unvalidated candidate items as produced by the extractor and
//! grown by the enricher. Entities are still keyed by name (normalization
//! happens at comparison time); workflow steps reference entities by
//! normalized name, not ID. The spec builder turns all of this into a frozen
//! `ProjectSpec`.

use prdgen_spec::{Diagnostic, FieldSpec, Priority};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Candidate entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDraft {
    /// Declared name, as written
    pub name: String,
    /// Ordered field declarations
    pub fields: Vec<FieldSpec>,
    /// Prose lines appended after the declaration
    pub description: String,
    /// True when synthesized (stub for an undeclared workflow entity)
    pub inferred: bool,
    /// Source line provenance
    pub source_lines: BTreeSet<u32>,
}

impl EntityDraft {
    /// Explicit entity from an `Entity:` directive
    #[must_use]
    pub fn declared(name: impl Into<String>, fields: Vec<FieldSpec>, line: u32) -> Self {
        Self {
            name: name.into(),
            fields,
            description: String::new(),
            inferred: false,
            source_lines: BTreeSet::from([line]),
        }
    }

    /// Inferred stub for an entity only referenced by a workflow step
    #[must_use]
    pub fn stub(name: impl Into<String>, source_lines: BTreeSet<u32>) -> Self {
        Self {
            name: name.into(),
            fields: vec![FieldSpec::default_id()],
            description: String::new(),
            inferred: true,
            source_lines,
        }
    }

    /// Normalized name used for deduplication and cross-referencing
    #[inline]
    #[must_use]
    pub fn normalized_name(&self) -> String {
        prdgen_spec::normalize_name(&self.name)
    }
}

/// Candidate requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementDraft {
    /// Requirement text, grown by prose continuation lines
    pub text: String,
    /// Priority parsed from the leading keyword
    pub priority: Priority,
    /// Linked entities, by normalized name
    pub linked_entities: BTreeSet<String>,
    /// True when synthesized (baseline list/create requirements)
    pub inferred: bool,
    /// Source line provenance
    pub source_lines: BTreeSet<u32>,
}

impl RequirementDraft {
    /// Explicit requirement from a `Req:` directive
    #[must_use]
    pub fn declared(text: impl Into<String>, line: u32) -> Self {
        let text = text.into();
        Self {
            priority: Priority::from_leading_keyword(&text),
            text,
            linked_entities: BTreeSet::new(),
            inferred: false,
            source_lines: BTreeSet::from([line]),
        }
    }

    /// Inferred baseline requirement linked to one entity
    #[must_use]
    pub fn baseline(
        text: impl Into<String>,
        entity_norm_name: impl Into<String>,
        source_lines: BTreeSet<u32>,
    ) -> Self {
        Self {
            text: text.into(),
            priority: Priority::Should,
            linked_entities: BTreeSet::from([entity_norm_name.into()]),
            inferred: true,
            source_lines,
        }
    }
}

/// Candidate workflow step; `entity_name` is filled in by the enricher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDraft {
    /// Step action text as extracted
    pub action: String,
    /// Normalized name of the entity the step operates on, if identified
    pub entity_name: Option<String>,
    /// True when the reference was satisfied by a synthesized stub
    pub inferred: bool,
}

impl StepDraft {
    /// Unresolved step straight from extraction
    #[inline]
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            entity_name: None,
            inferred: false,
        }
    }
}

/// Candidate workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDraft {
    /// Trigger event text
    pub trigger_event: String,
    /// Ordered steps
    pub steps: Vec<StepDraft>,
    /// Prose lines appended after the declaration
    pub description: String,
    /// Source line provenance
    pub source_lines: BTreeSet<u32>,
}

/// The full raw IR: extractor output, enricher input and output
///
/// The enricher only ever appends to these collections; nothing a user
/// declared is removed or rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIr {
    /// Project name from the last `Name:` directive, if any
    pub project_name: Option<String>,
    /// Prose attached after a `Name:` directive; a rendering concern, kept
    /// for provenance but not part of the frozen spec
    pub project_description: String,
    /// Candidate entities in declaration order
    pub entities: Vec<EntityDraft>,
    /// Candidate requirements in declaration order
    pub requirements: Vec<RequirementDraft>,
    /// Candidate workflows in declaration order
    pub workflows: Vec<WorkflowDraft>,
    /// Diagnostics collected during extraction, in input-line order
    pub diagnostics: Vec<Diagnostic>,
}

impl RawIr {
    /// Whether an entity with the given normalized name exists
    #[must_use]
    pub fn has_entity(&self, normalized: &str) -> bool {
        self.entities.iter().any(|e| e.normalized_name() == normalized)
    }
}
