use crate::types::DbId;

/// Error taxonomy shared by entities, storage backends and services.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing project.
    pub fn project_not_found(id: DbId) -> Self {
        Self::NotFound {
            entity: "Project",
            id,
        }
    }

    /// Shorthand for a missing task.
    pub fn task_not_found(id: DbId) -> Self {
        Self::NotFound { entity: "Task", id }
    }
}
