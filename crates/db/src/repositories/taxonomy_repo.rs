//! Repository for the `categories`, `tags`, and post-association tables.

use sqlx::{PgConnection, PgPool};

use pressroom_core::types::DbId;

use crate::models::taxonomy::{Category, CreateCategory, CreateTag, Tag};

/// Column list for `categories` queries.
const CATEGORY_COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

/// Column list for `tags` queries.
const TAG_COLUMNS: &str = "id, name, slug, created_at, updated_at";

/// Provides category/tag CRUD and post-association operations.
pub struct TaxonomyRepo;

impl TaxonomyRepo {
    // ── Category and tag CRUD ────────────────────────────────────────

    /// Insert a new category, returning the created row.
    pub async fn create_category(
        pool: &PgPool,
        input: &CreateCategory,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, slug, description)
             VALUES ($1, $2, $3)
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Insert a new tag, returning the created row.
    pub async fn create_tag(pool: &PgPool, input: &CreateTag) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name, slug)
             VALUES ($1, $2)
             RETURNING {TAG_COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    /// List all categories ordered by name.
    pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// List all tags ordered by name.
    pub async fn list_tags(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags ORDER BY name");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    // ── Post associations ────────────────────────────────────────────

    /// Attach a category to a post. Idempotent.
    pub async fn attach_category(
        pool: &PgPool,
        post_id: DbId,
        category_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO post_categories (post_id, category_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(category_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Attach a tag to a post. Idempotent.
    pub async fn attach_tag(pool: &PgPool, post_id: DbId, tag_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO post_tags (post_id, tag_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(tag_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Category ids associated with a post.
    pub async fn category_ids_for_post(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT category_id FROM post_categories WHERE post_id = $1 ORDER BY category_id",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Tag ids associated with a post.
    pub async fn tag_ids_for_post(pool: &PgPool, post_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT tag_id FROM post_tags WHERE post_id = $1 ORDER BY tag_id")
                .bind(post_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Count a post's category and tag associations in one round trip.
    ///
    /// Takes a connection because the approval/publish gate runs inside the
    /// workflow transaction, under the post row lock.
    pub async fn taxonomy_counts_for_post(
        conn: &mut PgConnection,
        post_id: DbId,
    ) -> Result<(i64, i64), sqlx::Error> {
        let row: (i64, i64) = sqlx::query_as(
            "SELECT \
                (SELECT COUNT(*) FROM post_categories WHERE post_id = $1), \
                (SELECT COUNT(*) FROM post_tags WHERE post_id = $1)",
        )
        .bind(post_id)
        .fetch_one(conn)
        .await?;
        Ok(row)
    }

    // ── Replacement (transaction-composable) ─────────────────────────

    /// Replace a post's category associations with the given id list.
    ///
    /// Delete-then-insert, not a merge; runs on the caller's connection so
    /// publication applies the snapshot's lists atomically.
    pub async fn replace_categories(
        conn: &mut PgConnection,
        post_id: DbId,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *conn)
            .await?;
        for category_id in category_ids {
            sqlx::query(
                "INSERT INTO post_categories (post_id, category_id) \
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(post_id)
            .bind(category_id)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Replace a post's tag associations with the given id list.
    pub async fn replace_tags(
        conn: &mut PgConnection,
        post_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *conn)
            .await?;
        for tag_id in tag_ids {
            sqlx::query(
                "INSERT INTO post_tags (post_id, tag_id) \
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }
}
