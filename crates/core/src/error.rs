use crate::types::DbId;

/// Domain-level error type shared across the workspace.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Approval/publish gating requirements that are not met. Carries one
    /// human-readable message per missing requirement.
    #[error("Requirements not met: {}", .0.join("; "))]
    RequirementsNotMet(Vec<String>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirements_not_met_joins_messages() {
        let err = CoreError::RequirementsNotMet(vec![
            "At least one category is required".to_string(),
            "At least one tag is required".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Requirements not met: At least one category is required; At least one tag is required"
        );
    }

    #[test]
    fn not_found_names_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "post",
            id: 42,
        };
        assert_eq!(err.to_string(), "Entity not found: post with id 42");
    }

    #[test]
    fn unauthorized_display() {
        let err = CoreError::Unauthorized("role 'writer' may not publish".to_string());
        assert!(err.to_string().starts_with("Unauthorized:"));
    }
}
