//! Enrichment rule table
//!
//! Fills structural gaps in raw IR with deterministic defaults. Enrichment
//! never deletes or rewrites extracted data; every item it adds carries
//! `inferred = true` so the traceability report can always tell user intent
//! from synthesized filler. Running the enricher on its own output is a
//! no-op (idempotence is a tested property).

use crate::ir::{EntityDraft, RawIr, RequirementDraft};
use prdgen_spec::{normalize_name, FieldSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Toggles for the two rules the requirements leave open
///
/// Entity-name linkage inside requirement text and baseline suppression are
/// independent: an explicit requirement mentioning "customers" can link to
/// the `customer` entity without counting as that entity's list/create
/// baseline, or count as both, depending on these settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Link requirements to entities whose name occurs in the text
    pub link_requirements_by_name: bool,
    /// Skip baseline synthesis for entities already linked to a
    /// user-declared requirement
    pub suppress_baseline_on_link: bool,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            link_requirements_by_name: true,
            suppress_baseline_on_link: false,
        }
    }
}

type Rule = fn(&Enricher, &mut RawIr);

/// Ordered rule table; rules only add, so the order is behavior-neutral
/// except that baseline synthesis observes links created by earlier rules.
const RULES: &[(&str, Rule)] = &[
    ("default-id-field", Enricher::rule_default_id_field),
    ("stub-entities", Enricher::rule_stub_entities),
    ("link-requirements", Enricher::rule_link_requirements),
    ("baseline-requirements", Enricher::rule_baseline_requirements),
];

/// The enrichment pass
#[derive(Debug, Clone, Copy, Default)]
pub struct Enricher {
    config: EnrichmentConfig,
}

impl Enricher {
    /// Enricher with the given rule toggles
    #[inline]
    #[must_use]
    pub fn new(config: EnrichmentConfig) -> Self {
        Self { config }
    }

    /// Apply the rule table to raw IR
    #[must_use]
    pub fn enrich(&self, mut ir: RawIr) -> RawIr {
        for (name, rule) in RULES {
            let before = (ir.entities.len(), ir.requirements.len());
            rule(self, &mut ir);
            let added_entities = ir.entities.len() - before.0;
            let added_requirements = ir.requirements.len() - before.1;
            if added_entities > 0 || added_requirements > 0 {
                tracing::debug!(
                    rule = name,
                    added_entities,
                    added_requirements,
                    "enrichment rule applied"
                );
            }
        }
        ir
    }

    /// Entity with zero fields gets a singular opaque `id` field.
    fn rule_default_id_field(&self, ir: &mut RawIr) {
        for entity in &mut ir.entities {
            if entity.fields.is_empty() {
                entity.fields.push(FieldSpec::default_id());
            }
        }
    }

    /// Workflow steps referencing undeclared entities get stub entities.
    ///
    /// A two-token step is read as `<action> <entity>` (`archive book`
    /// references `book`) and mints a stub when the entity is unknown.
    /// Longer steps never mint stubs; once all stubs exist they link to a
    /// known entity occurring in the action text, so free-form steps like
    /// `send welcome email` stay unresolved instead of minting an `email`
    /// entity.
    fn rule_stub_entities(&self, ir: &mut RawIr) {
        let mut known: BTreeSet<String> =
            ir.entities.iter().map(|e| e.normalized_name()).collect();

        // Phase 1: resolve two-token steps, minting stubs as needed.
        let mut stubs: Vec<(String, BTreeSet<u32>)> = Vec::new();
        for workflow in &mut ir.workflows {
            for step in &mut workflow.steps {
                if step.entity_name.is_some() {
                    continue;
                }
                let tokens: Vec<&str> = step.action.split_whitespace().collect();
                if tokens.len() != 2 {
                    continue;
                }
                let candidate = normalize_name(tokens[1]);
                if known.insert(candidate.clone()) {
                    stubs.push((candidate.clone(), workflow.source_lines.clone()));
                    step.inferred = true;
                }
                step.entity_name = Some(candidate);
            }
        }

        // Phase 2: remaining steps link against the complete entity set, so
        // the result does not depend on step order and a second pass finds
        // nothing new.
        for workflow in &mut ir.workflows {
            for step in &mut workflow.steps {
                if step.entity_name.is_none() {
                    step.entity_name = find_known_entity(&step.action, &known);
                }
            }
        }

        for (name, lines) in stubs {
            ir.entities.push(EntityDraft::stub(name, lines));
        }
    }

    /// User-declared requirement text mentioning a known entity name links
    /// to it.
    ///
    /// Case-insensitive substring match, best effort: every matching entity
    /// gets linked, ambiguity is preserved rather than resolved. Inferred
    /// baseline requirements are exempt; they keep exactly the one link they
    /// were synthesized with.
    fn rule_link_requirements(&self, ir: &mut RawIr) {
        if !self.config.link_requirements_by_name {
            return;
        }
        let names: Vec<String> = ir.entities.iter().map(|e| e.normalized_name()).collect();
        for req in ir.requirements.iter_mut().filter(|r| !r.inferred) {
            let text = normalize_name(&req.text);
            for name in &names {
                if text.contains(name.as_str()) {
                    req.linked_entities.insert(name.clone());
                }
            }
        }
    }

    /// Entities without requirements get baseline list/view and create
    /// requirements.
    ///
    /// An entity already carrying an inferred baseline is skipped (this is
    /// what makes a second enrichment pass a no-op). With
    /// `suppress_baseline_on_link` set, a link from any user-declared
    /// requirement also counts as coverage and suppresses the baselines.
    fn rule_baseline_requirements(&self, ir: &mut RawIr) {
        let mut synthesized: BTreeSet<String> = BTreeSet::new();
        let mut baselines: Vec<RequirementDraft> = Vec::new();
        for entity in &ir.entities {
            let norm = entity.normalized_name();
            if synthesized.contains(&norm) {
                continue;
            }
            let has_baseline = ir
                .requirements
                .iter()
                .any(|r| r.inferred && r.linked_entities.contains(&norm));
            if has_baseline {
                continue;
            }
            let has_user_link = ir
                .requirements
                .iter()
                .any(|r| !r.inferred && r.linked_entities.contains(&norm));
            if self.config.suppress_baseline_on_link && has_user_link {
                continue;
            }
            synthesized.insert(norm.clone());
            baselines.push(RequirementDraft::baseline(
                format!("List and view {} records", entity.name),
                norm.clone(),
                entity.source_lines.clone(),
            ));
            baselines.push(RequirementDraft::baseline(
                format!("Create new {} records", entity.name),
                norm,
                entity.source_lines.clone(),
            ));
        }
        ir.requirements.extend(baselines);
    }
}

/// Find a known entity whose name occurs as a substring of the normalized
/// step action; ties resolve to the lexicographically smallest name.
fn find_known_entity(action: &str, known: &BTreeSet<String>) -> Option<String> {
    let action = normalize_name(action);
    known.iter().find(|name| action.contains(name.as_str())).cloned()
}
