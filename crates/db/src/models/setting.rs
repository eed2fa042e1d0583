//! Key/value settings entity model.

use serde::Serialize;
use sqlx::FromRow;

use pressroom_core::types::{DbId, Timestamp};

/// A row from the `settings` table.
///
/// A generic JSON store keyed by dotted names (e.g.
/// `workflow.config.default`, `workflow.config.recipe`,
/// `site.publish_webhook_url`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Setting {
    pub id: DbId,
    pub key: String,
    pub value: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
