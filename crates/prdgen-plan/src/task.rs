//! Planned generation work units

use prdgen_spec::{EntityId, RequirementId, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of artifact a task produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskKind {
    /// Data model artifact for one entity
    Model,
    /// Workflow artifact; depends on the models of every entity it touches
    Workflow,
    /// Documentation artifact for a requirement with no entity/workflow link
    Doc,
}

/// One planned unit of generation work
///
/// Tasks form a DAG; dependency edges only ever point from workflow tasks to
/// model tasks, so the graph stays shallow and tasks of the same kind are
/// trivially parallelizable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTask {
    /// Unique task identifier
    pub id: TaskId,
    /// Artifact path the generator will produce
    pub artifact_path: String,
    /// Task kind
    pub kind: TaskKind,
    /// Tasks that must complete before this one starts
    pub depends_on: BTreeSet<TaskId>,
    /// Requirements this task (partially) satisfies
    pub origin_requirement_ids: BTreeSet<RequirementId>,
    /// Entity this task was derived from, for model tasks
    pub origin_entity_id: Option<EntityId>,
}

impl FileTask {
    /// Create a task with no dependencies or origins
    #[inline]
    #[must_use]
    pub fn new(kind: TaskKind, id: TaskId, artifact_path: impl Into<String>) -> Self {
        Self {
            id,
            artifact_path: artifact_path.into(),
            kind,
            depends_on: BTreeSet::new(),
            origin_requirement_ids: BTreeSet::new(),
            origin_entity_id: None,
        }
    }

    /// With a dependency edge
    #[inline]
    #[must_use]
    pub fn depends_on(mut self, task_id: TaskId) -> Self {
        self.depends_on.insert(task_id);
        self
    }

    /// With an originating requirement
    #[inline]
    #[must_use]
    pub fn with_origin_requirement(mut self, id: RequirementId) -> Self {
        self.origin_requirement_ids.insert(id);
        self
    }

    /// With an originating entity
    #[inline]
    #[must_use]
    pub fn with_origin_entity(mut self, id: EntityId) -> Self {
        self.origin_entity_id = Some(id);
        self
    }
}
