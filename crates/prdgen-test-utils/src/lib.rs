//! Testing utilities for the prdgen workspace
//!
//! Shared PRD fixtures, pipeline helpers, and a scripted generator double.

#![allow(missing_docs)]

use prdgen_core::{Generator, PipelineConfig};
use prdgen_extract::{load_lines, Enricher, Extractor, SpecBuilder};
use prdgen_plan::{FileTask, Planner, TaskOutcome};
use prdgen_spec::ProjectSpec;
use std::sync::Mutex;
use std::time::Duration;

/// A PRD exercising every directive kind
pub const FULL_PRD: &str = "\
Name: Webshop
An online store for small vendors.
Entity: Customer(id, email, name)
Entity: Order(id, total)
Req: Users can place orders
Req: must send order confirmations
On checkout: create order; send order confirmations to the customer
On signup: create customer";

/// A PRD whose workflow references entities nobody declared
pub const STUB_MINTING_PRD: &str = "\
Entity: Customer(id)
On signup: create customer; create session; send welcome email to the new customer";

/// A PRD with one requirement that links to nothing
pub const UNLINKED_REQ_PRD: &str = "\
Entity: Customer(id)
Req: comply with accessibility guidelines";

pub fn build_spec(text: &str) -> ProjectSpec {
    build_spec_with(text, &PipelineConfig::default())
}

pub fn build_spec_with(text: &str, config: &PipelineConfig) -> ProjectSpec {
    let ir = Extractor::new().extract(&load_lines(text));
    let ir = Enricher::new(config.enrichment()).enrich(ir);
    SpecBuilder::new().build(&ir).unwrap()
}

pub fn plan_for(text: &str) -> (ProjectSpec, Vec<FileTask>) {
    let spec = build_spec(text);
    let plan = Planner::new().plan(&spec).unwrap();
    (spec, plan)
}

/// Generator double driven by artifact-path patterns
///
/// Succeeds by default, fails any task whose artifact path contains one of
/// the configured substrings, and records the order tasks were handed over.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    fail_patterns: Vec<String>,
    delay: Option<Duration>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    #[must_use]
    pub fn succeeding() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing_paths(patterns: &[&str]) -> Self {
        Self {
            fail_patterns: patterns.iter().map(|p| (*p).to_string()).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Artifact paths in the order tasks were started
    pub fn seen_paths(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, task: &FileTask) -> TaskOutcome {
        self.seen.lock().unwrap().push(task.artifact_path.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self
            .fail_patterns
            .iter()
            .any(|p| task.artifact_path.contains(p.as_str()))
        {
            TaskOutcome::failed(format!("scripted failure for {}", task.artifact_path))
        } else {
            TaskOutcome::succeeded(vec![task.artifact_path.clone()])
        }
    }
}
