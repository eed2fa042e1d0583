//! Repository for the `workflow_transitions` table.
//!
//! The transition table is append-only: this repository deliberately
//! provides no update or delete operations.

use sqlx::{PgConnection, PgPool};

use pressroom_core::types::DbId;

use crate::models::workflow_transition::WorkflowTransition;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, version_id, from_status, to_status, performed_by, comment, created_at";

/// Provides append and history-read operations for workflow transitions.
pub struct WorkflowTransitionRepo;

impl WorkflowTransitionRepo {
    /// Append a transition record.
    ///
    /// `from_status` is `None` only when recording a version's initial
    /// creation. Takes a connection so the append shares the workflow
    /// transaction.
    pub async fn create(
        conn: &mut PgConnection,
        version_id: DbId,
        from_status: Option<&str>,
        to_status: &str,
        performed_by: Option<DbId>,
        comment: Option<&str>,
    ) -> Result<WorkflowTransition, sqlx::Error> {
        let query = format!(
            "INSERT INTO workflow_transitions
                (version_id, from_status, to_status, performed_by, comment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(version_id)
            .bind(from_status)
            .bind(to_status)
            .bind(performed_by)
            .bind(comment)
            .fetch_one(conn)
            .await
    }

    /// List a version's transitions in creation order (oldest first).
    pub async fn list_by_version(
        pool: &PgPool,
        version_id: DbId,
    ) -> Result<Vec<WorkflowTransition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_transitions
             WHERE version_id = $1
             ORDER BY id"
        );
        sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(version_id)
            .fetch_all(pool)
            .await
    }

    /// List every transition across all of a post's versions, oldest first.
    pub async fn list_by_post(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<WorkflowTransition>, sqlx::Error> {
        sqlx::query_as::<_, WorkflowTransition>(
            "SELECT t.id, t.version_id, t.from_status, t.to_status, t.performed_by, \
                    t.comment, t.created_at \
             FROM workflow_transitions t \
             JOIN content_versions v ON t.version_id = v.id \
             WHERE v.post_id = $1 \
             ORDER BY t.id",
        )
            .bind(post_id)
            .fetch_all(pool)
            .await
    }

    /// The most recent transition for a version (if any).
    pub async fn latest_for_version(
        pool: &PgPool,
        version_id: DbId,
    ) -> Result<Option<WorkflowTransition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_transitions
             WHERE version_id = $1
             ORDER BY id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(version_id)
            .fetch_optional(pool)
            .await
    }
}
