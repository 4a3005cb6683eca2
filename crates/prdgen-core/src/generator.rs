//! Generator boundary and bounded concurrent runner
//!
//! Artifact generation is an external collaborator behind the [`Generator`]
//! trait. The [`GeneratorRunner`] drives a planned task list depth by depth:
//! all of a task's dependencies live at strictly lower depths, so running one
//! depth at a time with a barrier in between preserves the plan's ordering
//! guarantees while letting independent tasks run concurrently.

use crate::config::PipelineConfig;
use futures::stream::{self, StreamExt};
use prdgen_plan::{ArtifactManifest, FileTask, TaskOutcome};
use prdgen_spec::TaskId;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// External artifact generator
///
/// Implementations must be infallible at the trait level: a task that cannot
/// be generated is reported as a failed [`TaskOutcome`], never a panic or an
/// error that aborts the run.
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    /// Generate the artifact for one task
    async fn generate(&self, task: &FileTask) -> TaskOutcome;
}

/// Shared cooperative cancellation flag
///
/// Cloning yields another handle to the same flag. Cancellation is a
/// request, not preemption: in-flight tasks finish their depth, everything
/// after is recorded as failed.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// A fresh, uncancelled flag
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Executes planned tasks through a generator with bounded concurrency
#[derive(Debug, Clone)]
pub struct GeneratorRunner {
    max_concurrent: usize,
    task_timeout: Duration,
    cancel: CancellationFlag,
}

impl GeneratorRunner {
    /// Runner configured from pipeline settings
    #[inline]
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            max_concurrent: config.max_concurrent_tasks.max(1),
            task_timeout: config.task_timeout,
            cancel: CancellationFlag::new(),
        }
    }

    /// Attach a shared cancellation flag
    #[inline]
    #[must_use]
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancel = flag;
        self
    }

    /// Run every task in the planned order, returning the full manifest
    ///
    /// `tasks` must be in dependency order (the planner's output). Every
    /// task gets an outcome: timeouts and cancellations are recorded as
    /// failures, so the manifest is always complete for tracing.
    pub async fn run<G>(&self, generator: &G, tasks: &[FileTask]) -> ArtifactManifest
    where
        G: Generator + ?Sized,
    {
        let mut manifest = ArtifactManifest::new();

        for level in depth_levels(tasks) {
            if self.cancel.is_cancelled() {
                break;
            }

            let outcomes: Vec<(TaskId, TaskOutcome)> = stream::iter(level)
                .map(|task| self.run_one(generator, task))
                .buffer_unordered(self.max_concurrent)
                .collect()
                .await;
            for (id, outcome) in outcomes {
                manifest.record(id, outcome);
            }
        }

        // Anything without an outcome was skipped by cancellation.
        for task in tasks {
            if manifest.outcome(&task.id).is_none() {
                manifest.record(task.id.clone(), TaskOutcome::failed("cancelled"));
            }
        }
        manifest
    }

    async fn run_one<G>(&self, generator: &G, task: &FileTask) -> (TaskId, TaskOutcome)
    where
        G: Generator + ?Sized,
    {
        if self.cancel.is_cancelled() {
            return (task.id.clone(), TaskOutcome::failed("cancelled"));
        }
        tracing::debug!(task = %task.id, path = %task.artifact_path, "generating");
        let outcome = match tokio::time::timeout(self.task_timeout, generator.generate(task)).await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(task = %task.id, timeout = ?self.task_timeout, "task timed out");
                TaskOutcome::failed(format!("timed out after {:?}", self.task_timeout))
            }
        };
        (task.id.clone(), outcome)
    }
}

/// Group dependency-ordered tasks into depth levels
///
/// Depth is 1 + the maximum depth of any dependency (0 for roots). The input
/// order guarantees every dependency is seen before its dependents, so one
/// forward pass suffices.
fn depth_levels(tasks: &[FileTask]) -> Vec<Vec<&FileTask>> {
    let mut depth_of: BTreeMap<&TaskId, usize> = BTreeMap::new();
    let mut levels: Vec<Vec<&FileTask>> = Vec::new();

    for task in tasks {
        let depth = task
            .depends_on
            .iter()
            .filter_map(|dep| depth_of.get(dep))
            .max()
            .map_or(0, |max| max + 1);
        depth_of.insert(&task.id, depth);
        if levels.len() <= depth {
            levels.resize_with(depth + 1, Vec::new);
        }
        levels[depth].push(task);
    }
    levels
}
