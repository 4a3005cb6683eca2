//! Pipeline configuration

use prdgen_extract::EnrichmentConfig;
use std::time::Duration;

/// Configuration for a pipeline run
///
/// Defaults are the documented behavior; every knob exists because callers
/// have a legitimate reason to flip it, not for tuning folklore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Link non-inferred requirements to entities named in their text
    pub link_requirements_by_name: bool,
    /// Skip baseline synthesis for entities already covered by a
    /// user-declared requirement
    pub suppress_baseline_on_link: bool,
    /// Upper bound on generator tasks running at once within a depth
    pub max_concurrent_tasks: usize,
    /// Per-task generation deadline; overruns become failed outcomes
    pub task_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            link_requirements_by_name: true,
            suppress_baseline_on_link: false,
            max_concurrent_tasks: 4,
            task_timeout: Duration::from_secs(60),
        }
    }
}

impl PipelineConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set requirement-to-entity name linking
    #[inline]
    #[must_use]
    pub fn with_link_requirements_by_name(mut self, enabled: bool) -> Self {
        self.link_requirements_by_name = enabled;
        self
    }

    /// Set baseline suppression for user-covered entities
    #[inline]
    #[must_use]
    pub fn with_suppress_baseline_on_link(mut self, enabled: bool) -> Self {
        self.suppress_baseline_on_link = enabled;
        self
    }

    /// Set the concurrency bound for the generator runner
    #[inline]
    #[must_use]
    pub fn with_max_concurrent_tasks(mut self, max: usize) -> Self {
        self.max_concurrent_tasks = max;
        self
    }

    /// Set the per-task generation deadline
    #[inline]
    #[must_use]
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = timeout;
        self
    }

    /// The enrichment-rule subset of this configuration
    #[inline]
    #[must_use]
    pub fn enrichment(&self) -> EnrichmentConfig {
        EnrichmentConfig {
            link_requirements_by_name: self.link_requirements_by_name,
            suppress_baseline_on_link: self.suppress_baseline_on_link,
        }
    }
}
