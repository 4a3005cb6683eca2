//! Parse diagnostics
//!
//! Diagnostics are values collected alongside normal output, never thrown as
//! control flow: malformed or unrecognized PRD lines degrade gracefully and
//! the run still completes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity; nothing here is fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Informational (unattached prose, repeated `Name:` lines)
    Info,
    /// Degraded extraction (malformed directive body, empty step list)
    Warning,
}

/// A single diagnostic attached to a PRD source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based PRD line number
    pub line_number: u32,
    /// Human-readable message
    pub message: String,
    /// Severity
    pub severity: Severity,
}

impl Diagnostic {
    /// Informational diagnostic
    #[inline]
    #[must_use]
    pub fn info(line_number: u32, message: impl Into<String>) -> Self {
        Self {
            line_number,
            message: message.into(),
            severity: Severity::Info,
        }
    }

    /// Warning diagnostic
    #[inline]
    #[must_use]
    pub fn warning(line_number: u32, message: impl Into<String>) -> Self {
        Self {
            line_number,
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        write!(f, "{}: line {}: {}", label, self.line_number, self.message)
    }
}
