//! PRD line loader
//!
//! Splits raw PRD text into tagged logical lines. The loader interprets
//! nothing: it only trims line endings, skips blank lines and classifies each
//! remaining line by directive prefix so the extractor and diagnostics can
//! refer back to exact source positions.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Directive shape recognized on a line, by prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectiveKind {
    /// `Name: <project name>`
    Name,
    /// `Entity: <Name>(<field>, ...)`
    Entity,
    /// `Req: <free text>`
    Requirement,
    /// `On <event>: <step>; <step>; ...`
    Workflow,
    /// Anything else; appended as description to the preceding directive
    Prose,
}

/// A single classified PRD line, never mutated after loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLine {
    /// 1-based source line number
    pub line_number: u32,
    /// Line content with the line ending stripped, untrimmed otherwise
    pub raw_text: String,
    /// Classified directive shape
    pub directive_kind: DirectiveKind,
}

static WORKFLOW_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^on\s+\S.*:").expect("workflow prefix regex"));

/// Classification table: first matching prefix wins, `Prose` is the fallback.
fn classify(trimmed: &str) -> DirectiveKind {
    let lower = trimmed.to_lowercase();
    if lower.starts_with("name:") {
        DirectiveKind::Name
    } else if lower.starts_with("entity:") {
        DirectiveKind::Entity
    } else if lower.starts_with("req:") {
        DirectiveKind::Requirement
    } else if WORKFLOW_PREFIX.is_match(trimmed) {
        DirectiveKind::Workflow
    } else {
        DirectiveKind::Prose
    }
}

/// Load PRD text into classified lines
///
/// Blank lines are dropped; everything else is kept verbatim with its
/// 1-based line number.
#[must_use]
pub fn load_lines(text: &str) -> Vec<RawLine> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return None;
            }
            Some(RawLine {
                line_number: (idx + 1) as u32,
                raw_text: line.trim_end_matches('\r').to_string(),
                directive_kind: classify(trimmed),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_all_directive_kinds() {
        let lines = load_lines(
            "Name: Demo\nEntity: Customer(id)\nReq: list customers\nOn signup: create customer\nsome prose\n",
        );
        let kinds: Vec<_> = lines.iter().map(|l| l.directive_kind).collect();
        assert_eq!(
            kinds,
            vec![
                DirectiveKind::Name,
                DirectiveKind::Entity,
                DirectiveKind::Requirement,
                DirectiveKind::Workflow,
                DirectiveKind::Prose,
            ]
        );
    }

    #[test]
    fn prefixes_are_case_insensitive() {
        let lines = load_lines("NAME: x\nentity: Y(a)\nREQ: z\non click: do thing");
        assert_eq!(lines[0].directive_kind, DirectiveKind::Name);
        assert_eq!(lines[1].directive_kind, DirectiveKind::Entity);
        assert_eq!(lines[2].directive_kind, DirectiveKind::Requirement);
        assert_eq!(lines[3].directive_kind, DirectiveKind::Workflow);
    }

    #[test]
    fn blank_lines_are_skipped_but_numbering_is_preserved() {
        let lines = load_lines("Name: Demo\n\n\nReq: something");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_number, 1);
        assert_eq!(lines[1].line_number, 4);
    }

    #[test]
    fn on_without_colon_is_prose() {
        let lines = load_lines("On the other hand this is just text");
        assert_eq!(lines[0].directive_kind, DirectiveKind::Prose);
    }

    #[test]
    fn crlf_endings_are_stripped() {
        let lines = load_lines("Req: windows text\r\n");
        assert_eq!(lines[0].raw_text, "Req: windows text");
    }
}
