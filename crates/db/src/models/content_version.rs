//! Content version entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pressroom_core::types::{DbId, Timestamp};

/// A row from the `content_versions` table.
///
/// The snapshot is immutable once captured; only `workflow_status`,
/// `is_active`, and `scheduled_for` change over a version's life. At most
/// one version per post has `is_active = true`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentVersion {
    pub id: DbId,
    pub post_id: DbId,
    pub version_number: i32,
    pub content_snapshot: serde_json::Value,
    pub workflow_status: String,
    pub is_active: bool,
    pub scheduled_for: Option<Timestamp>,
    pub created_by: Option<DbId>,
    pub version_note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new content version.
///
/// The version number is assigned by the repository (max + 1 per post);
/// the initial workflow status is always `draft`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentVersion {
    pub post_id: DbId,
    pub content_snapshot: serde_json::Value,
    pub created_by: Option<DbId>,
    pub version_note: Option<String>,
    pub scheduled_for: Option<Timestamp>,
}
