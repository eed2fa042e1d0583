//! Repository for the `posts` table.

use sqlx::{PgConnection, PgPool};

use pressroom_core::status::{STATUS_DRAFT, STATUS_PUBLISHED};
use pressroom_core::types::DbId;

use crate::models::post::{CreatePost, Post, UpdatePost};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, post_type, title, slug, excerpt, body, hero_image_path, fields, \
    status, workflow_status, author_id, active_version_id, draft_version_id, preview_token, \
    published_at, deleted_at, created_at, updated_at";

/// Provides CRUD and workflow-mirroring operations for posts.
pub struct PostRepo;

impl PostRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a new post in `draft` status, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePost) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts
                (post_type, title, slug, excerpt, body, hero_image_path, fields, author_id)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, '{{}}'::jsonb), $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(&input.post_type)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.body)
            .bind(&input.hero_image_path)
            .bind(&input.fields)
            .bind(input.author_id)
            .fetch_one(pool)
            .await
    }

    /// Find a post by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a post by slug. Excludes soft-deleted rows.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE slug = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Post>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List posts in a given workflow status, newest first.
    pub async fn list_by_workflow_status(
        pool: &PgPool,
        workflow_status: &str,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts
             WHERE workflow_status = $1 AND deleted_at IS NULL
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(workflow_status)
            .fetch_all(pool)
            .await
    }

    /// Update a post's editorial fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists (or is soft-deleted).
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                excerpt = COALESCE($4, excerpt),
                body = COALESCE($5, body),
                hero_image_path = COALESCE($6, hero_image_path),
                fields = COALESCE($7, fields)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.body)
            .bind(&input.hero_image_path)
            .bind(&input.fields)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a post by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE posts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted post. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE posts SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Workflow primitives (transaction-composable) ─────────────────

    /// Fetch a post with a `FOR UPDATE` row lock.
    ///
    /// Serializes concurrent workflow operations on the same post; must be
    /// the first statement of every workflow transaction.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Mirror a version's workflow status onto the owning post.
    pub async fn set_workflow_status(
        conn: &mut PgConnection,
        id: DbId,
        workflow_status: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE posts SET workflow_status = $2 WHERE id = $1")
            .bind(id)
            .bind(workflow_status)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Apply versioned field values onto the post row.
    ///
    /// `None` fields are left untouched, matching snapshot-application
    /// semantics where absent keys keep their current value.
    pub async fn apply_versioned_fields(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE posts SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                excerpt = COALESCE($4, excerpt),
                body = COALESCE($5, body),
                hero_image_path = COALESCE($6, hero_image_path),
                fields = COALESCE($7, fields)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.excerpt)
        .bind(&input.body)
        .bind(&input.hero_image_path)
        .bind(&input.fields)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Mark a post published with the given active version.
    pub async fn mark_published(
        conn: &mut PgConnection,
        id: DbId,
        version_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE posts SET
                status = $2,
                workflow_status = $2,
                published_at = NOW(),
                active_version_id = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(STATUS_PUBLISHED)
        .bind(version_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Take a post off the live site: back to draft, activation cleared.
    pub async fn mark_unpublished(conn: &mut PgConnection, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE posts SET
                status = $2,
                workflow_status = $2,
                published_at = NULL,
                active_version_id = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(STATUS_DRAFT)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Point the post's active version reference (or clear it).
    pub async fn set_active_version(
        conn: &mut PgConnection,
        id: DbId,
        version_id: Option<DbId>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE posts SET active_version_id = $2 WHERE id = $1")
            .bind(id)
            .bind(version_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Point the post's draft version reference (or clear it).
    pub async fn set_draft_version(
        conn: &mut PgConnection,
        id: DbId,
        version_id: Option<DbId>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE posts SET draft_version_id = $2 WHERE id = $1")
            .bind(id)
            .bind(version_id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
