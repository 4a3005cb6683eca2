//! Workflows: event-triggered step sequences

use crate::ids::{EntityId, WorkflowId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single workflow step
///
/// Every `entity_id` carried by a step resolves to an entity in the same
/// frozen spec; the enricher guarantees this by creating stubs before the
/// builder resolves references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Step action text (`create customer`, `send welcome email`)
    pub action: String,
    /// Entity the step operates on, when one could be identified
    pub entity_id: Option<EntityId>,
    /// True when the entity reference was satisfied by a synthesized stub
    pub inferred: bool,
}

/// A canonical workflow in a frozen spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    /// Deterministic identifier derived from the trigger event
    pub id: WorkflowId,
    /// Trigger event text from the `On <event>:` directive
    pub trigger_event: String,
    /// Ordered steps
    pub steps: Vec<WorkflowStep>,
    /// Free-text description accumulated from trailing prose lines
    pub description: String,
    /// PRD line numbers the workflow was declared on
    pub source_lines: BTreeSet<u32>,
}

impl Workflow {
    /// Entities referenced by any step, deduplicated, in sorted order
    #[must_use]
    pub fn referenced_entities(&self) -> BTreeSet<EntityId> {
        self.steps
            .iter()
            .filter_map(|s| s.entity_id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referenced_entities_dedups() {
        let customer = EntityId::from_name("customer");
        let wf = Workflow {
            id: WorkflowId::from_event("signup"),
            trigger_event: "signup".to_string(),
            steps: vec![
                WorkflowStep {
                    action: "create customer".to_string(),
                    entity_id: Some(customer.clone()),
                    inferred: false,
                },
                WorkflowStep {
                    action: "notify customer".to_string(),
                    entity_id: Some(customer.clone()),
                    inferred: false,
                },
                WorkflowStep {
                    action: "send welcome email".to_string(),
                    entity_id: None,
                    inferred: false,
                },
            ],
            description: String::new(),
            source_lines: BTreeSet::new(),
        };
        assert_eq!(wf.referenced_entities().len(), 1);
        assert!(wf.referenced_entities().contains(&customer));
    }
}
