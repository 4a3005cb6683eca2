//! prdgen-core - pipeline orchestration
//!
//! Ties the front end (extraction and enrichment), the data model, and the
//! back end (planning, generation, traceability) into a single driver:
//! [`Pipeline::run`] takes PRD text and an external [`Generator`] and
//! returns a [`PipelineRun`] holding the frozen spec, the ordered plan, the
//! artifact manifest, and the coverage report.

pub mod config;
pub mod error;
pub mod generator;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use generator::{CancellationFlag, Generator, GeneratorRunner};
pub use pipeline::{Pipeline, PipelineAnalysis, PipelineRun};

/// Commonly used types, re-exported for callers
pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::error::PipelineError;
    pub use crate::generator::{CancellationFlag, Generator, GeneratorRunner};
    pub use crate::pipeline::{Pipeline, PipelineAnalysis, PipelineRun};
    pub use prdgen_plan::{
        ArtifactManifest, FileTask, Planner, TaskKind, TaskOutcome, TraceStatus,
        TraceabilityEngine, TraceabilityReport,
    };
    pub use prdgen_spec::{
        Diagnostic, Entity, EntityId, ProjectSpec, Requirement, RequirementId, Severity, TaskId,
        Workflow, WorkflowId,
    };
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
