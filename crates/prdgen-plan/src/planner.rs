//! Generation planner
//!
//! Converts a frozen `ProjectSpec` into a dependency-ordered sequence of
//! [`FileTask`]s: one model task per entity, one workflow task per workflow
//! (depending on the models of every entity it references), and one doc task
//! per requirement that links to nothing. Ordering is a deterministic
//! topological sort with ties broken by ascending artifact path, so the
//! build order never depends on map or set iteration order.

use crate::error::PlanningError;
use crate::task::{FileTask, TaskKind};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use prdgen_spec::{EntityId, ProjectSpec, TaskId};
use std::collections::{BTreeMap, BTreeSet};

/// Plans generation work from a frozen spec
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner;

impl Planner {
    /// Create a new planner
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Produce the ordered task list for a frozen spec
    ///
    /// # Errors
    /// `PlanningError` when the derived graph violates DAG invariants;
    /// structurally impossible for specs assembled by the builder, fatal if
    /// it happens anyway.
    pub fn plan(&self, spec: &ProjectSpec) -> Result<Vec<FileTask>, PlanningError> {
        let tasks = self.derive_tasks(spec);
        let ordered = order_tasks(tasks)?;
        tracing::info!(tasks = ordered.len(), "plan assembled");
        Ok(ordered)
    }

    /// Derive the unordered task set covering every entity, workflow, and
    /// unlinked requirement.
    fn derive_tasks(&self, spec: &ProjectSpec) -> Vec<FileTask> {
        let mut tasks = Vec::new();
        let mut model_ids: BTreeMap<EntityId, TaskId> = BTreeMap::new();

        for entity_id in spec.entities().keys() {
            let slug = entity_id.as_str().trim_start_matches("ent-").to_string();
            let task_id = TaskId::new("model", &slug);
            model_ids.insert(entity_id.clone(), task_id.clone());

            let mut task = FileTask::new(TaskKind::Model, task_id, format!("models/{slug}"))
                .with_origin_entity(entity_id.clone());
            for req in spec.requirements_for_entity(entity_id) {
                task.origin_requirement_ids.insert(req.id.clone());
            }
            tasks.push(task);
        }

        for (workflow_id, workflow) in spec.workflows() {
            let slug = workflow_id.as_str().trim_start_matches("wf-").to_string();
            let mut task = FileTask::new(
                TaskKind::Workflow,
                TaskId::new("workflow", &slug),
                format!("workflows/{slug}"),
            );
            for entity_id in workflow.referenced_entities() {
                if let Some(model_id) = model_ids.get(&entity_id) {
                    task.depends_on.insert(model_id.clone());
                }
            }
            for req in spec.requirements_for_workflow(workflow_id) {
                task.origin_requirement_ids.insert(req.id.clone());
            }
            tasks.push(task);
        }

        // Doc tasks record the gap but carry no origins: an unverifiable
        // requirement must stay uncovered in the traceability report, not be
        // covered by its own placeholder.
        for (req_id, req) in spec.requirements() {
            if req.is_unlinked() {
                tasks.push(FileTask::new(
                    TaskKind::Doc,
                    TaskId::new("doc", req_id.as_str()),
                    format!("docs/requirements/{req_id}"),
                ));
            }
        }

        tasks
    }
}

/// Topologically order tasks, deterministically
///
/// Kahn's algorithm over a petgraph adjacency; the ready set is kept sorted
/// by `(artifact_path, id)` so equal-depth tasks always come out in
/// ascending path order. Leftover nodes after the sweep mean a cycle.
///
/// # Errors
/// `PlanningError` on duplicate task IDs, dangling dependencies, or cycles.
pub fn order_tasks(tasks: Vec<FileTask>) -> Result<Vec<FileTask>, PlanningError> {
    let mut index_of: BTreeMap<&TaskId, usize> = BTreeMap::new();
    for (idx, task) in tasks.iter().enumerate() {
        if index_of.insert(&task.id, idx).is_some() {
            return Err(PlanningError::DuplicateTask { id: task.id.to_string() });
        }
    }

    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for idx in 0..tasks.len() {
        graph.add_node(idx);
    }
    for (idx, task) in tasks.iter().enumerate() {
        for dep in &task.depends_on {
            let dep_idx = *index_of.get(dep).ok_or_else(|| PlanningError::UnknownDependency {
                task: task.id.to_string(),
                dependency: dep.to_string(),
            })?;
            graph.add_edge(dep_idx, idx, ());
        }
    }

    let mut indegree: Vec<usize> = (0..tasks.len())
        .map(|idx| graph.neighbors_directed(idx, Direction::Incoming).count())
        .collect();

    let mut ready: BTreeSet<(&str, usize)> = indegree
        .iter()
        .enumerate()
        .filter(|(_, d)| **d == 0)
        .map(|(idx, _)| (tasks[idx].artifact_path.as_str(), idx))
        .collect();

    let mut order: Vec<usize> = Vec::with_capacity(tasks.len());
    while let Some(&(path, idx)) = ready.iter().next() {
        ready.remove(&(path, idx));
        order.push(idx);
        for succ in graph.neighbors_directed(idx, Direction::Outgoing) {
            indegree[succ] -= 1;
            if indegree[succ] == 0 {
                ready.insert((tasks[succ].artifact_path.as_str(), succ));
            }
        }
    }

    if order.len() != tasks.len() {
        let stuck = indegree
            .iter()
            .position(|d| *d > 0)
            .map(|idx| tasks[idx].id.to_string())
            .unwrap_or_default();
        return Err(PlanningError::CycleDetected { task: stuck });
    }

    let mut by_index: BTreeMap<usize, FileTask> =
        tasks.into_iter().enumerate().collect();
    Ok(order
        .into_iter()
        .map(|idx| by_index.remove(&idx).expect("index from the same task set"))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prdgen_extract::{load_lines, Enricher, EnrichmentConfig, Extractor, SpecBuilder};
    use pretty_assertions::assert_eq;

    fn plan(text: &str) -> Vec<FileTask> {
        let ir = Extractor::new().extract(&load_lines(text));
        let ir = Enricher::new(EnrichmentConfig::default()).enrich(ir);
        let spec = SpecBuilder::new().build(&ir).unwrap();
        Planner::new().plan(&spec).unwrap()
    }

    fn assert_valid_topological_order(tasks: &[FileTask]) {
        let mut seen: BTreeSet<&TaskId> = BTreeSet::new();
        for task in tasks {
            for dep in &task.depends_on {
                assert!(seen.contains(dep), "dependency {dep} after dependent {}", task.id);
            }
            assert!(seen.insert(&task.id), "task {} appears twice", task.id);
        }
    }

    #[test]
    fn models_precede_workflows() {
        let tasks = plan("Entity: Customer(id)\nOn signup: create customer; send welcome email");
        assert_valid_topological_order(&tasks);
        let model_pos = tasks.iter().position(|t| t.kind == TaskKind::Model).unwrap();
        let wf_pos = tasks.iter().position(|t| t.kind == TaskKind::Workflow).unwrap();
        assert!(model_pos < wf_pos);
        assert_eq!(tasks[wf_pos].depends_on.len(), 1);
    }

    #[test]
    fn unlinked_requirement_gets_doc_task_without_origins() {
        let tasks = plan("Req: comply with accessibility guidelines");
        let docs: Vec<_> = tasks.iter().filter(|t| t.kind == TaskKind::Doc).collect();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].depends_on.is_empty());
        assert!(docs[0].origin_requirement_ids.is_empty());
    }

    #[test]
    fn linked_requirements_flow_into_model_origins() {
        let tasks = plan("Entity: Customer(id)\nReq: Users can list customers");
        let model = tasks.iter().find(|t| t.kind == TaskKind::Model).unwrap();
        // Explicit requirement plus two baselines, all linked by name.
        assert_eq!(model.origin_requirement_ids.len(), 3);
    }

    #[test]
    fn ties_break_by_ascending_artifact_path() {
        let tasks = plan("Entity: Zebra(id)\nEntity: Apple(id)");
        let paths: Vec<_> = tasks
            .iter()
            .filter(|t| t.kind == TaskKind::Model)
            .map(|t| t.artifact_path.as_str())
            .collect();
        assert_eq!(paths, vec!["models/apple", "models/zebra"]);
    }

    #[test]
    fn planning_is_deterministic() {
        let text = "Name: Demo\nEntity: B(x)\nEntity: A(y)\nReq: track things\nOn go: update a; update b";
        assert_eq!(plan(text), plan(text));
    }

    #[test]
    fn covers_every_entity_and_workflow() {
        let tasks = plan("Entity: A(x)\nEntity: B(y)\nOn go: update a\nOn stop: update b");
        assert_eq!(tasks.iter().filter(|t| t.kind == TaskKind::Model).count(), 2);
        assert_eq!(tasks.iter().filter(|t| t.kind == TaskKind::Workflow).count(), 2);
    }

    #[test]
    fn cycle_is_fatal() {
        let a = TaskId::new("model", "a");
        let b = TaskId::new("model", "b");
        let tasks = vec![
            FileTask::new(TaskKind::Model, a.clone(), "models/a").depends_on(b.clone()),
            FileTask::new(TaskKind::Model, b, "models/b").depends_on(a),
        ];
        assert!(matches!(order_tasks(tasks), Err(PlanningError::CycleDetected { .. })));
    }

    #[test]
    fn dangling_dependency_is_fatal() {
        let tasks = vec![FileTask::new(TaskKind::Model, TaskId::new("model", "a"), "models/a")
            .depends_on(TaskId::new("model", "ghost"))];
        assert!(matches!(order_tasks(tasks), Err(PlanningError::UnknownDependency { .. })));
    }

    #[test]
    fn duplicate_task_id_is_fatal() {
        let id = TaskId::new("model", "a");
        let tasks = vec![
            FileTask::new(TaskKind::Model, id.clone(), "models/a"),
            FileTask::new(TaskKind::Model, id, "models/a2"),
        ];
        assert!(matches!(order_tasks(tasks), Err(PlanningError::DuplicateTask { .. })));
    }
}
