//! Requirements with stable IDs and cross-links

use crate::ids::{EntityId, RequirementId, WorkflowId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Requirement priority (MoSCoW subset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    /// Mandatory
    Must,
    /// Expected but negotiable
    Should,
    /// Nice to have
    Could,
}

impl Priority {
    /// Parse a priority from the leading keyword of requirement text
    ///
    /// `Req: must support refunds` carries `Must`; text without a leading
    /// keyword defaults to `Should`.
    #[must_use]
    pub fn from_leading_keyword(text: &str) -> Self {
        let first = text.split_whitespace().next().unwrap_or_default();
        let first = first.trim_end_matches(&[':', ','][..]);
        if first.eq_ignore_ascii_case("must") {
            Priority::Must
        } else if first.eq_ignore_ascii_case("could") {
            Priority::Could
        } else {
            Priority::Should
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Should
    }
}

/// A canonical requirement in a frozen spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Stable identifier (content hash, or sequence fallback on collision)
    pub id: RequirementId,
    /// Requirement text, including appended prose continuation lines
    pub text: String,
    /// Entities this requirement is linked to
    pub linked_entity_ids: BTreeSet<EntityId>,
    /// Workflows this requirement is linked to
    pub linked_workflow_ids: BTreeSet<WorkflowId>,
    /// True when synthesized by a default rule (baseline requirements)
    pub inferred: bool,
    /// Priority parsed from the requirement text
    pub priority: Priority,
    /// PRD line numbers the requirement text came from
    pub source_lines: BTreeSet<u32>,
}

impl Requirement {
    /// Whether this requirement links to neither an entity nor a workflow
    ///
    /// Unlinked requirements cannot originate generation tasks and always
    /// surface as `uncovered` in the traceability report.
    #[inline]
    #[must_use]
    pub fn is_unlinked(&self) -> bool {
        self.linked_entity_ids.is_empty() && self.linked_workflow_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_from_keyword() {
        assert_eq!(Priority::from_leading_keyword("must support refunds"), Priority::Must);
        assert_eq!(Priority::from_leading_keyword("Must: support refunds"), Priority::Must);
        assert_eq!(Priority::from_leading_keyword("could export CSV"), Priority::Could);
        assert_eq!(Priority::from_leading_keyword("users can log in"), Priority::Should);
        assert_eq!(Priority::from_leading_keyword(""), Priority::Should);
    }

    #[test]
    fn unlinked_detection() {
        let req = Requirement {
            id: RequirementId::from_text("standalone"),
            text: "standalone".to_string(),
            linked_entity_ids: BTreeSet::new(),
            linked_workflow_ids: BTreeSet::new(),
            inferred: false,
            priority: Priority::default(),
            source_lines: BTreeSet::new(),
        };
        assert!(req.is_unlinked());
    }
}
