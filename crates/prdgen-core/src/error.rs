//! Top-level pipeline errors
//!
//! Per-task generation failures are NOT errors; they are outcomes recorded
//! in the manifest so traceability can report them as coverage gaps. Only
//! violated data-model invariants, impossible plans, and cancellation abort
//! a run.

use prdgen_plan::PlanningError;
use prdgen_spec::SpecIntegrityError;

/// Fatal pipeline failures
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The assembled spec violated a data-model invariant
    #[error("spec integrity violated: {0}")]
    Integrity(#[from] SpecIntegrityError),

    /// The derived task graph could not be ordered
    #[error("planning failed: {0}")]
    Planning(#[from] PlanningError),

    /// The run was cancelled between stages
    #[error("pipeline run cancelled")]
    Cancelled,
}
