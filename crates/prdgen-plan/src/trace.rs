//! Traceability engine
//!
//! Cross-checks the generator's artifact manifest against the frozen spec:
//! one verdict per requirement, always, even (especially) for requirements
//! nothing could generate for. Unlinkable requirements must surface as gaps
//! rather than being silently excluded.

use crate::task::FileTask;
use prdgen_spec::{ProjectSpec, RequirementId, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-task result reported by the external generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutcome {
    /// Whether the task completed successfully
    pub success: bool,
    /// Identifiers of artifacts actually written
    pub artifacts: Vec<String>,
    /// Failure detail, if any
    pub error: Option<String>,
}

impl TaskOutcome {
    /// Successful outcome with the artifacts produced
    #[inline]
    #[must_use]
    pub fn succeeded(artifacts: Vec<String>) -> Self {
        Self {
            success: true,
            artifacts,
            error: None,
        }
    }

    /// Failed outcome with a reason
    #[inline]
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            artifacts: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// A task only counts toward coverage when it succeeded and actually
    /// produced something.
    #[inline]
    #[must_use]
    pub fn produced_artifacts(&self) -> bool {
        self.success && !self.artifacts.is_empty()
    }
}

/// Manifest of task outcomes keyed by task ID
///
/// Tasks absent from the manifest (cancelled before starting, abandoned
/// in-flight) count as failed when tracing coverage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    outcomes: BTreeMap<TaskId, TaskOutcome>,
}

impl ArtifactManifest {
    /// Empty manifest
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome for a task
    #[inline]
    pub fn record(&mut self, task_id: TaskId, outcome: TaskOutcome) {
        self.outcomes.insert(task_id, outcome);
    }

    /// Outcome for a task, if reported
    #[inline]
    #[must_use]
    pub fn outcome(&self, task_id: &TaskId) -> Option<&TaskOutcome> {
        self.outcomes.get(task_id)
    }

    /// Number of recorded outcomes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no outcomes were recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Iterate outcomes in task-ID order
    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &TaskOutcome)> {
        self.outcomes.iter()
    }
}

/// Coverage verdict for one requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceStatus {
    /// Every originating task succeeded with at least one artifact
    Covered,
    /// Some, but not all, originating tasks succeeded
    Partial,
    /// No originating tasks, or none succeeded
    Uncovered,
}

/// Coverage verdict and evidence for one requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceabilityRecord {
    /// The requirement being traced
    pub requirement_id: RequirementId,
    /// Artifacts produced by successful originating tasks
    pub satisfying_artifact_paths: BTreeSet<String>,
    /// Verdict
    pub status: TraceStatus,
}

/// Full traceability report, one record per requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceabilityReport {
    /// Records ordered by requirement ID
    pub records: Vec<TraceabilityRecord>,
    /// 100 x covered / total; 100.0 for an empty requirement set
    pub coverage_percent: f64,
}

impl TraceabilityReport {
    /// Number of fully covered requirements
    #[must_use]
    pub fn covered_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == TraceStatus::Covered)
            .count()
    }

    /// Whether every requirement is fully covered
    #[must_use]
    pub fn is_fully_covered(&self) -> bool {
        self.covered_count() == self.records.len()
    }

    /// Record for one requirement, if present
    #[must_use]
    pub fn record(&self, id: &RequirementId) -> Option<&TraceabilityRecord> {
        self.records.iter().find(|r| &r.requirement_id == id)
    }
}

/// Computes traceability reports from frozen specs and manifests
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceabilityEngine;

impl TraceabilityEngine {
    /// Create a new engine
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compute one record per requirement in the spec
    #[must_use]
    pub fn trace(
        &self,
        spec: &ProjectSpec,
        tasks: &[FileTask],
        manifest: &ArtifactManifest,
    ) -> TraceabilityReport {
        let requirement_ids: BTreeSet<&RequirementId> = spec.requirements().keys().collect();

        let mut records = Vec::with_capacity(requirement_ids.len());
        for req_id in requirement_ids {
            let originating: Vec<&FileTask> = tasks
                .iter()
                .filter(|t| t.origin_requirement_ids.contains(req_id))
                .collect();

            let mut satisfying: BTreeSet<String> = BTreeSet::new();
            let mut succeeded = 0usize;
            for task in &originating {
                if let Some(outcome) = manifest.outcome(&task.id) {
                    if outcome.produced_artifacts() {
                        succeeded += 1;
                        satisfying.extend(outcome.artifacts.iter().cloned());
                    }
                }
            }

            let status = if originating.is_empty() || succeeded == 0 {
                TraceStatus::Uncovered
            } else if succeeded == originating.len() {
                TraceStatus::Covered
            } else {
                TraceStatus::Partial
            };

            records.push(TraceabilityRecord {
                requirement_id: req_id.clone(),
                satisfying_artifact_paths: satisfying,
                status,
            });
        }

        let total = records.len();
        let covered = records
            .iter()
            .filter(|r| r.status == TraceStatus::Covered)
            .count();
        // Zero requirements is vacuous coverage, never a division fault.
        let coverage_percent = if total == 0 {
            100.0
        } else {
            100.0 * covered as f64 / total as f64
        };

        tracing::info!(total, covered, coverage_percent, "traceability computed");
        TraceabilityReport {
            records,
            coverage_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Planner;
    use crate::task::TaskKind;
    use prdgen_extract::{load_lines, Enricher, EnrichmentConfig, Extractor, SpecBuilder};

    fn spec_and_plan(text: &str) -> (ProjectSpec, Vec<FileTask>) {
        let ir = Extractor::new().extract(&load_lines(text));
        let ir = Enricher::new(EnrichmentConfig::default()).enrich(ir);
        let spec = SpecBuilder::new().build(&ir).unwrap();
        let plan = Planner::new().plan(&spec).unwrap();
        (spec, plan)
    }

    fn all_succeed(tasks: &[FileTask]) -> ArtifactManifest {
        let mut manifest = ArtifactManifest::new();
        for task in tasks {
            manifest.record(
                task.id.clone(),
                TaskOutcome::succeeded(vec![task.artifact_path.clone()]),
            );
        }
        manifest
    }

    #[test]
    fn full_success_is_full_coverage() {
        let (spec, plan) = spec_and_plan("Entity: Customer(id)\nReq: Users can list customers");
        let manifest = all_succeed(&plan);
        let report = TraceabilityEngine::new().trace(&spec, &plan, &manifest);
        assert!(report.is_fully_covered());
        assert_eq!(report.coverage_percent, 100.0);
    }

    #[test]
    fn unlinked_requirement_stays_uncovered_even_on_full_success() {
        let (spec, plan) = spec_and_plan("Req: comply with the law somehow");
        assert!(plan.iter().any(|t| t.kind == TaskKind::Doc));
        let manifest = all_succeed(&plan);
        let report = TraceabilityEngine::new().trace(&spec, &plan, &manifest);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].status, TraceStatus::Uncovered);
        assert!(report.records[0].satisfying_artifact_paths.is_empty());
        assert_eq!(report.coverage_percent, 0.0);
    }

    #[test]
    fn partial_when_one_of_two_tasks_fails() {
        // The explicit requirement links to both entities, so it originates
        // from two model tasks.
        let (spec, plan) =
            spec_and_plan("Entity: Customer(id)\nEntity: Order(id)\nReq: customers place orders");
        let req_id = spec
            .requirements()
            .values()
            .find(|r| !r.inferred)
            .map(|r| r.id.clone())
            .unwrap();

        let mut manifest = ArtifactManifest::new();
        for task in &plan {
            let outcome = if task.artifact_path == "models/order" {
                TaskOutcome::failed("generator crashed")
            } else {
                TaskOutcome::succeeded(vec![task.artifact_path.clone()])
            };
            manifest.record(task.id.clone(), outcome);
        }

        let report = TraceabilityEngine::new().trace(&spec, &plan, &manifest);
        assert_eq!(report.record(&req_id).unwrap().status, TraceStatus::Partial);
    }

    #[test]
    fn missing_outcome_counts_as_failure() {
        let (spec, plan) = spec_and_plan("Entity: Customer(id)\nReq: Users can list customers");
        let manifest = ArtifactManifest::new();
        let report = TraceabilityEngine::new().trace(&spec, &plan, &manifest);
        assert_eq!(report.covered_count(), 0);
        assert_eq!(report.coverage_percent, 0.0);
    }

    #[test]
    fn success_without_artifacts_does_not_count() {
        let (spec, plan) = spec_and_plan("Entity: Customer(id)\nReq: Users can list customers");
        let mut manifest = ArtifactManifest::new();
        for task in &plan {
            manifest.record(task.id.clone(), TaskOutcome::succeeded(Vec::new()));
        }
        let report = TraceabilityEngine::new().trace(&spec, &plan, &manifest);
        assert_eq!(report.covered_count(), 0);
    }

    #[test]
    fn empty_spec_is_vacuously_covered() {
        let (spec, plan) = spec_and_plan("Name: Empty");
        let report = TraceabilityEngine::new().trace(&spec, &plan, &ArtifactManifest::new());
        assert!(report.records.is_empty());
        assert_eq!(report.coverage_percent, 100.0);
    }

    #[test]
    fn records_are_ordered_by_requirement_id() {
        let (spec, plan) = spec_and_plan(
            "Entity: Customer(id)\nReq: Users can list customers\nReq: must audit all changes",
        );
        let manifest = all_succeed(&plan);
        let report = TraceabilityEngine::new().trace(&spec, &plan, &manifest);
        let ids: Vec<_> = report.records.iter().map(|r| r.requirement_id.clone()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
