//! prdgen-spec - Canonical domain model
//!
//! Defines the strict intermediate representation the prdgen pipeline
//! converges on:
//! - Deterministic identifiers (content-derived, stable across runs)
//! - Entities, requirements and workflows with `inferred` audit flags
//! - The frozen, immutable `ProjectSpec`
//! - Parse diagnostics and fatal integrity errors
//!
//! Everything the extractor and enricher synthesize carries `inferred = true`
//! so downstream consumers can always distinguish user intent from filler.

pub mod diagnostic;
pub mod entity;
pub mod error;
pub mod ids;
pub mod requirement;
pub mod spec;
pub mod workflow;

pub use diagnostic::{Diagnostic, Severity};
pub use entity::{Entity, FieldSpec, FieldType};
pub use error::SpecIntegrityError;
pub use ids::{normalize_name, slugify, EntityId, RequirementId, TaskId, WorkflowId};
pub use requirement::{Priority, Requirement};
pub use spec::ProjectSpec;
pub use workflow::{Workflow, WorkflowStep};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
