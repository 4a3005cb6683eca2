//! Spec builder
//!
//! Merges enriched raw IR into one canonical, frozen `ProjectSpec`:
//! entities deduplicated by normalized name, requirements assigned stable
//! IDs, workflow steps resolved from entity names to entity IDs. Freezing is
//! the final step; any failure before it discards the partial spec.

use crate::ir::RawIr;
use indexmap::IndexMap;
use prdgen_spec::{
    normalize_name, Entity, EntityId, FieldSpec, ProjectSpec, Requirement, RequirementId,
    SpecIntegrityError, Workflow, WorkflowId, WorkflowStep,
};
use std::collections::{BTreeSet, HashMap};

/// Project name used when the PRD carries no `Name:` directive
const DEFAULT_PROJECT_NAME: &str = "my-app";

/// Assembles frozen specs from raw IR
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecBuilder;

impl SpecBuilder {
    /// Create a new builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build and freeze a `ProjectSpec`
    ///
    /// # Errors
    /// `SpecIntegrityError` when a data-model invariant is violated: a
    /// stable-ID collision surviving the sequence fallback, or a workflow
    /// step whose entity the enricher failed to stub.
    pub fn build(&self, ir: &RawIr) -> Result<ProjectSpec, SpecIntegrityError> {
        let name = ir
            .project_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_PROJECT_NAME)
            .to_string();

        let entities = self.merge_entities(ir);
        let requirements = self.assign_requirement_ids(ir, &entities)?;
        let workflows = self.resolve_workflows(ir, &entities)?;

        let entities: IndexMap<EntityId, Entity> = entities
            .into_values()
            .map(|e| (e.id.clone(), e))
            .collect();

        tracing::info!(
            project = %name,
            entities = entities.len(),
            requirements = requirements.len(),
            workflows = workflows.len(),
            "spec frozen"
        );
        Ok(ProjectSpec::freeze(name, entities, requirements, workflows))
    }

    /// Deduplicate entities by normalized name, keeping the union of fields
    /// from all duplicate declarations in first-declaration order.
    fn merge_entities(&self, ir: &RawIr) -> IndexMap<String, Entity> {
        let mut merged: IndexMap<String, Entity> = IndexMap::new();
        for draft in &ir.entities {
            let norm = draft.normalized_name();
            match merged.get_mut(&norm) {
                None => {
                    merged.insert(
                        norm.clone(),
                        Entity {
                            id: EntityId::from_name(&norm),
                            name: draft.name.trim().to_string(),
                            fields: dedup_fields(draft.fields.iter().cloned()),
                            description: draft.description.clone(),
                            inferred: draft.inferred,
                            source_lines: draft.source_lines.clone(),
                        },
                    );
                }
                Some(existing) => {
                    // First occurrence wins on field type; later duplicates
                    // contribute new fields and new constraints only.
                    for field in &draft.fields {
                        match existing
                            .fields
                            .iter_mut()
                            .find(|f| f.name.eq_ignore_ascii_case(&field.name))
                        {
                            None => existing.fields.push(field.clone()),
                            Some(present) => merge_constraints(present, field),
                        }
                    }
                    if !draft.description.is_empty() {
                        if !existing.description.is_empty() {
                            existing.description.push(' ');
                        }
                        existing.description.push_str(&draft.description);
                    }
                    // Any explicit declaration outweighs inferred stubs.
                    existing.inferred &= draft.inferred;
                    existing.source_lines.extend(draft.source_lines.iter().copied());
                }
            }
        }

        // Distinct normalized names can still slugify to the same ID
        // ("foo bar" vs "foo-bar"); disambiguate with an index suffix so the
        // final id->entity map never silently drops an entity.
        let mut used: BTreeSet<EntityId> = BTreeSet::new();
        for entity in merged.values_mut() {
            let mut suffix = 2;
            while used.contains(&entity.id) {
                entity.id = EntityId::from_name_indexed(&entity.name, suffix);
                suffix += 1;
            }
            used.insert(entity.id.clone());
        }
        merged
    }

    /// Assign stable requirement IDs: content hash of the normalized text,
    /// falling back to a running sequence number when two requirements
    /// normalize to identical text. Duplicates are kept, not merged; the
    /// sequence follows original source order (raw IR order), never map
    /// iteration order.
    fn assign_requirement_ids(
        &self,
        ir: &RawIr,
        entities: &IndexMap<String, Entity>,
    ) -> Result<IndexMap<RequirementId, Requirement>, SpecIntegrityError> {
        let mut text_counts: HashMap<String, usize> = HashMap::new();
        for draft in &ir.requirements {
            *text_counts.entry(normalize_name(&draft.text)).or_insert(0) += 1;
        }

        let mut out: IndexMap<RequirementId, Requirement> = IndexMap::new();
        let mut sequence = 0usize;
        for draft in &ir.requirements {
            let norm_text = normalize_name(&draft.text);
            let id = if text_counts[&norm_text] > 1 {
                sequence += 1;
                RequirementId::from_sequence(sequence)
            } else {
                RequirementId::from_text(&draft.text)
            };

            let linked_entity_ids: BTreeSet<EntityId> = draft
                .linked_entities
                .iter()
                .filter_map(|name| entities.get(name).map(|e| e.id.clone()))
                .collect();

            let requirement = Requirement {
                id: id.clone(),
                text: draft.text.clone(),
                linked_entity_ids,
                linked_workflow_ids: BTreeSet::new(),
                inferred: draft.inferred,
                priority: draft.priority,
                source_lines: draft.source_lines.clone(),
            };
            if out.insert(id.clone(), requirement).is_some() {
                return Err(SpecIntegrityError::IdCollision { id: id.to_string() });
            }
        }
        Ok(out)
    }

    /// Resolve workflow step entity names to entity IDs; repeated trigger
    /// events get index-suffixed workflow IDs.
    fn resolve_workflows(
        &self,
        ir: &RawIr,
        entities: &IndexMap<String, Entity>,
    ) -> Result<IndexMap<WorkflowId, Workflow>, SpecIntegrityError> {
        let mut out: IndexMap<WorkflowId, Workflow> = IndexMap::new();
        for draft in &ir.workflows {
            let mut id = WorkflowId::from_event(&draft.trigger_event);
            let mut suffix = 2;
            while out.contains_key(&id) {
                id = WorkflowId::from_event_indexed(&draft.trigger_event, suffix);
                suffix += 1;
            }

            let mut steps = Vec::with_capacity(draft.steps.len());
            for step in &draft.steps {
                let entity_id = match &step.entity_name {
                    None => None,
                    Some(name) => Some(
                        entities
                            .get(name)
                            .map(|e| e.id.clone())
                            .ok_or_else(|| SpecIntegrityError::UnresolvedEntity {
                                workflow: draft.trigger_event.clone(),
                                entity: name.clone(),
                            })?,
                    ),
                };
                steps.push(WorkflowStep {
                    action: step.action.clone(),
                    entity_id,
                    inferred: step.inferred,
                });
            }

            out.insert(
                id.clone(),
                Workflow {
                    id,
                    trigger_event: draft.trigger_event.clone(),
                    steps,
                    description: draft.description.clone(),
                    source_lines: draft.source_lines.clone(),
                },
            );
        }
        Ok(out)
    }
}

/// Collapse duplicate field names (case-insensitive) within one declaration:
/// the first occurrence keeps its type, later duplicates only contribute
/// constraints not already present.
fn dedup_fields(fields: impl Iterator<Item = FieldSpec>) -> Vec<FieldSpec> {
    let mut out: Vec<FieldSpec> = Vec::new();
    for field in fields {
        match out
            .iter_mut()
            .find(|f| f.name.eq_ignore_ascii_case(&field.name))
        {
            None => out.push(field),
            Some(existing) => merge_constraints(existing, &field),
        }
    }
    out
}

fn merge_constraints(existing: &mut FieldSpec, incoming: &FieldSpec) {
    for constraint in &incoming.constraints {
        if !existing.constraints.contains(constraint) {
            existing.constraints.push(constraint.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enricher::{Enricher, EnrichmentConfig};
    use crate::extractor::Extractor;
    use crate::loader::load_lines;
    use crate::ir::StepDraft;
    use pretty_assertions::assert_eq;

    fn build(text: &str) -> ProjectSpec {
        let ir = Extractor::new().extract(&load_lines(text));
        let ir = Enricher::new(EnrichmentConfig::default()).enrich(ir);
        SpecBuilder::new().build(&ir).unwrap()
    }

    #[test]
    fn dedups_case_insensitive_entities_with_field_union() {
        let spec = build("Entity: Customer(id, email)\nEntity: customer(email, phone)");
        assert_eq!(spec.entities().len(), 1);
        let entity = spec.entities().values().next().unwrap();
        let names: Vec<_> = entity.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "email", "phone"]);
        assert!(!entity.inferred);
        assert_eq!(entity.source_lines, BTreeSet::from([1, 2]));
    }

    #[test]
    fn duplicate_fields_within_one_declaration_collapse() {
        let spec = build("Entity: Customer(id, Email, email)");
        let entity = spec.entities().values().next().unwrap();
        let names: Vec<_> = entity.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "Email"]);
    }

    #[test]
    fn duplicate_field_constraints_merge_across_declarations() {
        let mut ir = Extractor::new().extract(&load_lines("Entity: Customer(id)"));
        let mut dup = ir.entities[0].clone();
        dup.fields = vec![prdgen_spec::FieldSpec {
            name: "ID".to_string(),
            ty: prdgen_spec::FieldType::Opaque,
            constraints: vec!["unique".to_string()],
        }];
        ir.entities.push(dup);

        let spec = SpecBuilder::new().build(&ir).unwrap();
        let entity = spec.entities().values().next().unwrap();
        assert_eq!(entity.fields.len(), 1);
        // First declaration keeps its type; the later duplicate only adds
        // its constraint.
        assert_eq!(entity.fields[0].ty, prdgen_spec::FieldType::Text);
        assert_eq!(entity.fields[0].constraints, vec!["unique".to_string()]);
    }

    #[test]
    fn explicit_declaration_outweighs_stub() {
        let spec = build("On publish: archive book\nEntity: Book(title)");
        assert_eq!(spec.entities().len(), 1);
        assert!(!spec.entities().values().next().unwrap().inferred);
    }

    #[test]
    fn requirement_ids_are_stable_across_builds() {
        let text = "Entity: Customer(id)\nReq: Users can list customers";
        let a = build(text);
        let b = build(text);
        let ids_a: Vec<_> = a.requirements().keys().collect();
        let ids_b: Vec<_> = b.requirements().keys().collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn identical_requirement_texts_fall_back_to_sequence_ids() {
        let spec = build("Req: do the thing\nReq: do the THING");
        // Duplicates are kept, not merged.
        let user: Vec<_> = spec.requirements().values().filter(|r| !r.inferred).collect();
        assert_eq!(user.len(), 2);
        assert_eq!(user[0].id.as_str(), "R-SEQ-0001");
        assert_eq!(user[1].id.as_str(), "R-SEQ-0002");
    }

    #[test]
    fn workflow_steps_resolve_to_entity_ids() {
        let spec = build("Entity: Customer(id)\nOn signup: create customer; send welcome email");
        let wf = spec.workflows().values().next().unwrap();
        assert_eq!(wf.steps[0].entity_id, Some(EntityId::from_name("customer")));
        assert_eq!(wf.steps[1].entity_id, None);
    }

    #[test]
    fn stub_resolution_never_fails_after_enrichment() {
        let spec = build("On publish: archive book");
        let wf = spec.workflows().values().next().unwrap();
        assert_eq!(wf.steps[0].entity_id, Some(EntityId::from_name("book")));
        assert!(spec.entity(&EntityId::from_name("book")).unwrap().inferred);
    }

    #[test]
    fn unresolved_entity_is_an_integrity_error() {
        // Bypass the enricher to simulate a broken pipeline.
        let mut ir = Extractor::new().extract(&load_lines("On publish: archive book"));
        ir.workflows[0].steps[0] = StepDraft {
            action: "archive book".to_string(),
            entity_name: Some("book".to_string()),
            inferred: false,
        };
        let err = SpecBuilder::new().build(&ir).unwrap_err();
        assert!(matches!(err, SpecIntegrityError::UnresolvedEntity { .. }));
    }

    #[test]
    fn repeated_trigger_events_get_distinct_ids() {
        let spec = build("On signup: archive book\nOn signup: archive book");
        assert_eq!(spec.workflows().len(), 2);
        let ids: Vec<_> = spec.workflows().keys().map(WorkflowId::as_str).collect();
        assert_eq!(ids, vec!["wf-signup", "wf-signup-2"]);
    }

    #[test]
    fn missing_name_defaults() {
        let spec = build("Req: anything at all");
        assert_eq!(spec.name(), "my-app");
    }

    #[test]
    fn name_is_taken_from_directive() {
        let spec = build("Name: Course Marketplace\nReq: anything");
        assert_eq!(spec.name(), "Course Marketplace");
    }
}
