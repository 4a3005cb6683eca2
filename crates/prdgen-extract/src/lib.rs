//! prdgen-extract - PRD front end
//!
//! The lossy, tolerant half of the pipeline: load PRD text into classified
//! lines, extract raw IR from directive patterns, fill structural gaps with
//! the enrichment rule table, then merge everything into a frozen
//! `ProjectSpec`.
//!
//! Extraction and enrichment never fail; problems surface as collected
//! [`prdgen_spec::Diagnostic`] values. Only the spec builder can error, and
//! only on violated data-model invariants.

pub mod builder;
pub mod enricher;
pub mod extractor;
pub mod ir;
pub mod loader;

pub use builder::SpecBuilder;
pub use enricher::{Enricher, EnrichmentConfig};
pub use extractor::Extractor;
pub use ir::{EntityDraft, RawIr, RequirementDraft, StepDraft, WorkflowDraft};
pub use loader::{load_lines, DirectiveKind, RawLine};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
