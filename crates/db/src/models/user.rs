//! User and role entity models.
//!
//! Authentication is out of scope for this workspace; these rows exist as
//! actor references on versions/transitions and as notification recipients.
//! Role *checks* are performed against the caller-supplied actor role set,
//! not by querying these tables.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pressroom_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role_id: DbId,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub role_id: DbId,
}
