//! Pipeline stage driver
//!
//! Wires the stages end to end: load, extract, enrich, build, plan,
//! generate, trace. Cancellation is checked between stages; once generation
//! starts, cancellation degrades the manifest (failed outcomes) instead of
//! aborting, so the caller always gets a traceability report for whatever
//! did run.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::generator::{CancellationFlag, Generator, GeneratorRunner};
use prdgen_extract::{load_lines, Enricher, Extractor, SpecBuilder};
use prdgen_plan::{ArtifactManifest, FileTask, Planner, TraceabilityEngine, TraceabilityReport};
use prdgen_spec::{Diagnostic, ProjectSpec};
use serde::Serialize;

/// Everything a full pipeline run produces
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    /// The frozen project spec
    pub spec: ProjectSpec,
    /// Dependency-ordered generation plan
    pub plan: Vec<FileTask>,
    /// Per-task generation outcomes
    pub manifest: ArtifactManifest,
    /// Requirement coverage report
    pub report: TraceabilityReport,
    /// Diagnostics collected during extraction and enrichment
    pub diagnostics: Vec<Diagnostic>,
}

/// The non-generating prefix of a run: spec and plan, no artifacts
#[derive(Debug, Clone, Serialize)]
pub struct PipelineAnalysis {
    /// The frozen project spec
    pub spec: ProjectSpec,
    /// Dependency-ordered generation plan
    pub plan: Vec<FileTask>,
    /// Diagnostics collected during extraction and enrichment
    pub diagnostics: Vec<Diagnostic>,
}

/// Drives PRD text through the full pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    cancel: CancellationFlag,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl Pipeline {
    /// Pipeline with the given configuration
    #[inline]
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            cancel: CancellationFlag::new(),
        }
    }

    /// The active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// A handle to this pipeline's cancellation flag
    #[inline]
    #[must_use]
    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Run the full pipeline over PRD text
    ///
    /// # Errors
    /// `PipelineError::Integrity` or `::Planning` on violated invariants,
    /// `::Cancelled` when cancellation lands between stages. Per-task
    /// generation failures are outcomes in the manifest, never errors.
    pub async fn run<G>(&self, prd_text: &str, generator: &G) -> Result<PipelineRun, PipelineError>
    where
        G: Generator + ?Sized,
    {
        let analysis = self.analyze(prd_text)?;
        self.checkpoint()?;

        tracing::info!(tasks = analysis.plan.len(), "generation started");
        let runner =
            GeneratorRunner::new(&self.config).with_cancellation(self.cancel.clone());
        let manifest = runner.run(generator, &analysis.plan).await;

        let report = self.trace(&analysis.spec, &analysis.plan, &manifest);
        Ok(PipelineRun {
            spec: analysis.spec,
            plan: analysis.plan,
            manifest,
            report,
            diagnostics: analysis.diagnostics,
        })
    }

    /// Run only the analysis stages: load through plan
    ///
    /// # Errors
    /// Same as [`Pipeline::run`], minus generation.
    pub fn analyze(&self, prd_text: &str) -> Result<PipelineAnalysis, PipelineError> {
        self.checkpoint()?;
        let lines = load_lines(prd_text);
        tracing::info!(lines = lines.len(), "loaded");

        let ir = Extractor::new().extract(&lines);
        self.checkpoint()?;

        let ir = Enricher::new(self.config.enrichment()).enrich(ir);
        tracing::info!(
            entities = ir.entities.len(),
            requirements = ir.requirements.len(),
            workflows = ir.workflows.len(),
            diagnostics = ir.diagnostics.len(),
            "extraction complete"
        );
        self.checkpoint()?;

        let diagnostics = ir.diagnostics.clone();
        let spec = SpecBuilder::new().build(&ir)?;
        self.checkpoint()?;

        let plan = Planner::new().plan(&spec)?;
        Ok(PipelineAnalysis {
            spec,
            plan,
            diagnostics,
        })
    }

    /// Trace an existing run's manifest against its spec and plan
    #[must_use]
    pub fn trace(
        &self,
        spec: &ProjectSpec,
        plan: &[FileTask],
        manifest: &ArtifactManifest,
    ) -> TraceabilityReport {
        TraceabilityEngine::new().trace(spec, plan, manifest)
    }

    fn checkpoint(&self) -> Result<(), PipelineError> {
        if self.cancel.is_cancelled() {
            tracing::warn!("run cancelled between stages");
            return Err(PipelineError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_produces_frozen_spec_and_plan() {
        let pipeline = Pipeline::default();
        let analysis = pipeline
            .analyze("Name: Shop\nEntity: Customer(id, email)\nOn signup: create customer")
            .unwrap();
        assert!(analysis.spec.is_frozen());
        assert_eq!(analysis.spec.name(), "Shop");
        assert!(!analysis.plan.is_empty());
    }

    #[test]
    fn cancelled_before_start_errors() {
        let pipeline = Pipeline::default();
        pipeline.cancellation_flag().cancel();
        let result = pipeline.analyze("Entity: Customer(id)");
        assert!(matches!(result, Err(PipelineError::Cancelled)));
    }
}
