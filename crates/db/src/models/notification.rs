//! Notification entity model.

use serde::Serialize;
use sqlx::FromRow;

use pressroom_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
///
/// Carries the originating event type and payload inline; the
/// workflow_transitions table remains the authoritative audit trail.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub event_type: String,
    pub post_id: Option<DbId>,
    pub version_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub channel: String,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub is_delivered: bool,
    pub delivered_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
