//! Directive extractor
//!
//! Turns classified PRD lines into raw IR. This is a pure syntactic pass:
//! the only defaulting applied here is the untyped field marker on fields
//! without a type annotation. Malformed directive bodies degrade to warnings
//! plus partial items; unrecognized prose attaches to the preceding
//! directive. Identical input always yields identical IR and diagnostics.

use crate::ir::{EntityDraft, RawIr, RequirementDraft, StepDraft, WorkflowDraft};
use crate::loader::{DirectiveKind, RawLine};
use once_cell::sync::Lazy;
use prdgen_spec::{Diagnostic, FieldSpec};
use regex::Regex;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^name:\s*(?P<name>.+)$").expect("name regex"));
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^entity:\s*(?P<name>[^()]+?)\s*\((?P<fields>[^()]*)\)\s*$").expect("entity regex")
});
static ENTITY_NAME_ONLY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^entity:\s*(?P<name>[^(]+)").expect("entity name regex"));
static REQ_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^req:\s*(?P<text>.+)$").expect("req regex"));
static WORKFLOW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^on\s+(?P<event>[^:]+?)\s*:\s*(?P<steps>.*)$").expect("workflow regex")
});

/// Which directive item prose continuation lines attach to
#[derive(Debug, Clone, Copy)]
enum Attach {
    None,
    Name,
    Entity(usize),
    Requirement(usize),
    Workflow(usize),
}

/// Table-driven directive extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor;

impl Extractor {
    /// Create a new extractor
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Extract raw IR from classified lines
    #[must_use]
    pub fn extract(&self, lines: &[RawLine]) -> RawIr {
        let mut ir = RawIr::default();
        let mut attach = Attach::None;

        for line in lines {
            let trimmed = line.raw_text.trim();
            match line.directive_kind {
                DirectiveKind::Name => {
                    attach = self.extract_name(trimmed, line.line_number, &mut ir, attach);
                }
                DirectiveKind::Entity => {
                    attach = self.extract_entity(trimmed, line.line_number, &mut ir);
                }
                DirectiveKind::Requirement => {
                    attach = self.extract_requirement(trimmed, line.line_number, &mut ir, attach);
                }
                DirectiveKind::Workflow => {
                    attach = self.extract_workflow(trimmed, line.line_number, &mut ir);
                }
                DirectiveKind::Prose => {
                    self.attach_prose(trimmed, line.line_number, &mut ir, attach);
                }
            }
        }

        tracing::debug!(
            entities = ir.entities.len(),
            requirements = ir.requirements.len(),
            workflows = ir.workflows.len(),
            diagnostics = ir.diagnostics.len(),
            "extraction complete"
        );
        ir
    }

    fn extract_name(&self, text: &str, line: u32, ir: &mut RawIr, attach: Attach) -> Attach {
        let Some(caps) = NAME_RE.captures(text) else {
            ir.diagnostics.push(Diagnostic::warning(line, "empty project name"));
            return attach;
        };
        if ir.project_name.is_some() {
            ir.diagnostics.push(Diagnostic::info(
                line,
                "project name redeclared; later declaration wins",
            ));
        }
        ir.project_name = Some(caps["name"].trim().to_string());
        Attach::Name
    }

    fn extract_entity(&self, text: &str, line: u32, ir: &mut RawIr) -> Attach {
        if let Some(caps) = ENTITY_RE.captures(text) {
            let fields = parse_fields(&caps["fields"]);
            ir.entities.push(EntityDraft::declared(caps["name"].trim(), fields, line));
        } else {
            // Partial extraction beats total loss: keep the entity with an
            // empty field list and surface the malformed body as a warning.
            ir.diagnostics.push(Diagnostic::warning(
                line,
                "malformed entity directive; expected Entity: Name(field, ...)",
            ));
            let name = ENTITY_NAME_ONLY_RE
                .captures(text)
                .map(|c| c["name"].trim().trim_end_matches(')').trim().to_string())
                .unwrap_or_default();
            if name.is_empty() {
                return Attach::None;
            }
            ir.entities.push(EntityDraft::declared(name, Vec::new(), line));
        }
        Attach::Entity(ir.entities.len() - 1)
    }

    fn extract_requirement(
        &self,
        text: &str,
        line: u32,
        ir: &mut RawIr,
        attach: Attach,
    ) -> Attach {
        let Some(caps) = REQ_RE.captures(text) else {
            ir.diagnostics.push(Diagnostic::warning(line, "empty requirement"));
            return attach;
        };
        ir.requirements.push(RequirementDraft::declared(caps["text"].trim(), line));
        Attach::Requirement(ir.requirements.len() - 1)
    }

    fn extract_workflow(&self, text: &str, line: u32, ir: &mut RawIr) -> Attach {
        // The loader only tags lines matching `On <event>:`, so the capture
        // cannot fail; guard anyway to keep this pass total.
        let Some(caps) = WORKFLOW_RE.captures(text) else {
            ir.diagnostics.push(Diagnostic::warning(line, "malformed workflow directive"));
            return Attach::None;
        };
        let steps: Vec<StepDraft> = caps["steps"]
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(StepDraft::new)
            .collect();
        if steps.is_empty() {
            ir.diagnostics.push(Diagnostic::warning(line, "workflow has no steps"));
        }
        ir.workflows.push(WorkflowDraft {
            trigger_event: caps["event"].trim().to_string(),
            steps,
            description: String::new(),
            source_lines: std::collections::BTreeSet::from([line]),
        });
        Attach::Workflow(ir.workflows.len() - 1)
    }

    fn attach_prose(&self, text: &str, line: u32, ir: &mut RawIr, attach: Attach) {
        match attach {
            Attach::None => {
                ir.diagnostics.push(Diagnostic::info(
                    line,
                    "unattached descriptive text before any directive",
                ));
            }
            Attach::Name => {
                push_sentence(&mut ir.project_description, text);
            }
            Attach::Entity(idx) => {
                let draft = &mut ir.entities[idx];
                push_sentence(&mut draft.description, text);
                draft.source_lines.insert(line);
            }
            Attach::Requirement(idx) => {
                let draft = &mut ir.requirements[idx];
                push_sentence(&mut draft.text, text);
                draft.source_lines.insert(line);
            }
            Attach::Workflow(idx) => {
                let draft = &mut ir.workflows[idx];
                push_sentence(&mut draft.description, text);
                draft.source_lines.insert(line);
            }
        }
    }
}

/// Parse a comma-separated field list body; `name: type` annotations are
/// honored, bare names get the untyped marker.
fn parse_fields(body: &str) -> Vec<FieldSpec> {
    body.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|f| match f.split_once(':') {
            Some((name, ty)) if !ty.trim().is_empty() => {
                FieldSpec::declared(name.trim(), ty.trim())
            }
            _ => FieldSpec::text(f.trim_end_matches(':').trim()),
        })
        .collect()
}

fn push_sentence(target: &mut String, text: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}
