use pressroom_core::error::CoreError;

/// Error type for workflow service operations.
///
/// Wraps [`CoreError`] for domain failures (authorization, gating,
/// invalid state) and `sqlx::Error` for storage failures. A storage error
/// inside a workflow transaction rolls the whole transaction back; nothing
/// is partially applied.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// A domain-level error from `pressroom-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for workflow service return values.
pub type WorkflowResult<T> = Result<T, WorkflowError>;
