//! Content item (post) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pressroom_core::types::{DbId, Timestamp};

/// A row from the `posts` table.
///
/// `status` is the public visibility (`draft` or `published`);
/// `workflow_status` mirrors the post's active/draft version status for
/// fast filtering in editorial listings. Type-specific versioned values
/// (recipe ingredients, product SKU, ...) live in the `fields` JSONB
/// column; the per-type key registry is
/// [`pressroom_core::versionable`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub post_type: String,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub hero_image_path: Option<String>,
    pub fields: serde_json::Value,
    pub status: String,
    pub workflow_status: String,
    pub author_id: DbId,
    pub active_version_id: Option<DbId>,
    pub draft_version_id: Option<DbId>,
    pub preview_token: uuid::Uuid,
    pub published_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub post_type: String,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub hero_image_path: Option<String>,
    pub fields: Option<serde_json::Value>,
    pub author_id: DbId,
}

/// DTO for editing a post's working copy. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub hero_image_path: Option<String>,
    pub fields: Option<serde_json::Value>,
}
