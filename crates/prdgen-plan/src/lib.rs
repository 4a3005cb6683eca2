//! Generation planning and traceability
//!
//! The back half of the pipeline: turn a frozen `ProjectSpec` into a
//! dependency-ordered list of [`FileTask`]s, and audit the generator's
//! [`ArtifactManifest`] back against the spec's requirements to produce a
//! [`TraceabilityReport`]. Both halves are deterministic: the same spec
//! always yields the same task order, and the same manifest always yields
//! the same report.

pub mod error;
pub mod planner;
pub mod task;
pub mod trace;

pub use error::PlanningError;
pub use planner::{order_tasks, Planner};
pub use task::{FileTask, TaskKind};
pub use trace::{
    ArtifactManifest, TaskOutcome, TraceStatus, TraceabilityEngine, TraceabilityRecord,
    TraceabilityReport,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
