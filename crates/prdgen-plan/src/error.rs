//! Fatal planning errors
//!
//! Edges only flow from model tasks to workflow tasks, so a cycle (or a
//! dangling dependency) can only arise from a malformed spec; both are
//! treated as violated invariants that abort the run, not user input errors.

/// Planning failures
#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    /// The task graph contains a cycle
    #[error("cycle detected in task graph involving '{task}'")]
    CycleDetected {
        /// A task on the unresolvable cycle
        task: String,
    },

    /// A task depends on a task that does not exist
    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency {
        /// The dependent task
        task: String,
        /// The missing dependency
        dependency: String,
    },

    /// Two tasks share one identifier
    #[error("duplicate task id '{id}'")]
    DuplicateTask {
        /// The duplicated identifier
        id: String,
    },
}
