//! Fatal spec-assembly errors
//!
//! These indicate a violated data-model invariant, not a user input problem;
//! the pipeline aborts before producing artifacts when one is raised.

/// Integrity violations detected while assembling a `ProjectSpec`
#[derive(Debug, thiserror::Error)]
pub enum SpecIntegrityError {
    /// Two requirements produced the same stable ID even after the
    /// sequence-number fallback; indicates a builder bug
    #[error("duplicate requirement id after fallback sequencing: {id}")]
    IdCollision {
        /// The colliding identifier
        id: String,
    },

    /// A workflow step referenced an entity that was never declared or
    /// stubbed; the enricher is required to prevent this before freeze
    #[error("workflow '{workflow}' references unknown entity '{entity}'")]
    UnresolvedEntity {
        /// Trigger event of the offending workflow
        workflow: String,
        /// The unresolved entity name
        entity: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let e = SpecIntegrityError::IdCollision { id: "R-SEQ-0001".to_string() };
        assert!(e.to_string().contains("R-SEQ-0001"));

        let e = SpecIntegrityError::UnresolvedEntity {
            workflow: "publish".to_string(),
            entity: "book".to_string(),
        };
        assert!(e.to_string().contains("book"));
    }
}
