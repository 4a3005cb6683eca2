//! The frozen project specification
//!
//! `ProjectSpec` is the single source of truth for the planner, generator and
//! traceability engine. It can only be constructed through [`ProjectSpec::freeze`]
//! and exposes read-only accessors afterwards, so no downstream component can
//! mutate it. Maps are insertion-ordered (`IndexMap`), keeping iteration
//! deterministic across runs.

use crate::entity::Entity;
use crate::ids::{EntityId, RequirementId, WorkflowId};
use crate::requirement::Requirement;
use crate::workflow::Workflow;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Immutable, canonical project specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSpec {
    name: String,
    entities: IndexMap<EntityId, Entity>,
    requirements: IndexMap<RequirementId, Requirement>,
    workflows: IndexMap<WorkflowId, Workflow>,
    frozen: bool,
}

impl ProjectSpec {
    /// Freeze a fully assembled spec
    ///
    /// This is the builder's final, irreversible step; there is no way to
    /// construct an unfrozen `ProjectSpec`.
    #[must_use]
    pub fn freeze(
        name: String,
        entities: IndexMap<EntityId, Entity>,
        requirements: IndexMap<RequirementId, Requirement>,
        workflows: IndexMap<WorkflowId, Workflow>,
    ) -> Self {
        Self {
            name,
            entities,
            requirements,
            workflows,
            frozen: true,
        }
    }

    /// Project name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the spec is frozen (always true once constructed)
    #[inline]
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// All entities, in declaration order
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &IndexMap<EntityId, Entity> {
        &self.entities
    }

    /// All requirements, in assignment order
    #[inline]
    #[must_use]
    pub fn requirements(&self) -> &IndexMap<RequirementId, Requirement> {
        &self.requirements
    }

    /// All workflows, in declaration order
    #[inline]
    #[must_use]
    pub fn workflows(&self) -> &IndexMap<WorkflowId, Workflow> {
        &self.workflows
    }

    /// Look up an entity by ID
    #[inline]
    #[must_use]
    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Look up a requirement by ID
    #[inline]
    #[must_use]
    pub fn requirement(&self, id: &RequirementId) -> Option<&Requirement> {
        self.requirements.get(id)
    }

    /// Look up a workflow by ID
    #[inline]
    #[must_use]
    pub fn workflow(&self, id: &WorkflowId) -> Option<&Workflow> {
        self.workflows.get(id)
    }

    /// Requirements linked to the given entity
    pub fn requirements_for_entity<'a>(
        &'a self,
        entity_id: &'a EntityId,
    ) -> impl Iterator<Item = &'a Requirement> {
        self.requirements
            .values()
            .filter(move |r| r.linked_entity_ids.contains(entity_id))
    }

    /// Requirements linked to the given workflow
    pub fn requirements_for_workflow<'a>(
        &'a self,
        workflow_id: &'a WorkflowId,
    ) -> impl Iterator<Item = &'a Requirement> {
        self.requirements
            .values()
            .filter(move |r| r.linked_workflow_ids.contains(workflow_id))
    }
}
