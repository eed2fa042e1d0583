//! Workflow transition audit record.

use serde::Serialize;
use sqlx::FromRow;

use pressroom_core::types::{DbId, Timestamp};

/// A row from the `workflow_transitions` table.
///
/// Append-only: rows are never updated or deleted, and history is
/// reconstructed by ordering on `id`. `from_status` is null only for the
/// transition recording a version's initial creation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowTransition {
    pub id: DbId,
    pub version_id: DbId,
    pub from_status: Option<String>,
    pub to_status: String,
    pub performed_by: Option<DbId>,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}
