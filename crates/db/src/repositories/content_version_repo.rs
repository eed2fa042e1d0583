//! Repository for the `content_versions` table.

use sqlx::{PgConnection, PgPool};

use pressroom_core::status::{STATUS_DRAFT, STATUS_SCHEDULED};
use pressroom_core::types::{DbId, Timestamp};

use crate::models::content_version::{ContentVersion, CreateContentVersion};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, post_id, version_number, content_snapshot, workflow_status, \
    is_active, scheduled_for, created_by, version_note, created_at, updated_at";

/// Provides CRUD and activation-management operations for content versions.
pub struct ContentVersionRepo;

impl ContentVersionRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a new version in `draft` status, auto-assigning the next
    /// version number for the post (max + 1, starting at 1).
    ///
    /// Takes a connection so version-number assignment shares the caller's
    /// transaction and stays gap-free under the post row lock.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateContentVersion,
    ) -> Result<ContentVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO content_versions
                (post_id, version_number, content_snapshot, workflow_status, created_by,
                 version_note, scheduled_for)
             VALUES (
                $1,
                (SELECT COALESCE(MAX(version_number), 0) + 1 FROM content_versions WHERE post_id = $1),
                $2, $3, $4, $5, $6
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentVersion>(&query)
            .bind(input.post_id)
            .bind(&input.content_snapshot)
            .bind(STATUS_DRAFT)
            .bind(input.created_by)
            .bind(&input.version_note)
            .bind(input.scheduled_for)
            .fetch_one(conn)
            .await
    }

    /// Find a version by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContentVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_versions WHERE id = $1");
        sqlx::query_as::<_, ContentVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Re-read a version inside a transaction with a `FOR UPDATE` lock.
    ///
    /// Used by the workflow service after taking the post lock, so the
    /// status it validates against cannot be stale.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<ContentVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_versions WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, ContentVersion>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List all versions for a post, ordered by version number descending.
    pub async fn list_by_post(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<ContentVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_versions
             WHERE post_id = $1
             ORDER BY version_number DESC"
        );
        sqlx::query_as::<_, ContentVersion>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }

    /// Find the currently active version for a post (if any).
    pub async fn find_active_for_post(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Option<ContentVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_versions WHERE post_id = $1 AND is_active = true"
        );
        sqlx::query_as::<_, ContentVersion>(&query)
            .bind(post_id)
            .fetch_optional(pool)
            .await
    }

    /// Get the next version number for a post (max existing + 1, or 1 if none).
    pub async fn next_version_number(pool: &PgPool, post_id: DbId) -> Result<i32, sqlx::Error> {
        let row: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(version_number), 0) + 1 \
             FROM content_versions WHERE post_id = $1",
        )
        .bind(post_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    // ── Workflow primitives (transaction-composable) ─────────────────

    /// Set a version's workflow status.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        workflow_status: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE content_versions SET workflow_status = $2 WHERE id = $1")
            .bind(id)
            .bind(workflow_status)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Deactivate every version of a post. Returns the number of rows touched.
    pub async fn deactivate_all_for_post(
        conn: &mut PgConnection,
        post_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE content_versions SET is_active = false \
             WHERE post_id = $1 AND is_active = true",
        )
        .bind(post_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Deactivate a single version.
    pub async fn deactivate(conn: &mut PgConnection, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE content_versions SET is_active = false WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Activate a version, deactivating all of its siblings first.
    ///
    /// Both statements run on the caller's connection; the caller owns the
    /// transaction (and the post row lock) so the at-most-one-active
    /// invariant holds at commit. Returns `false` if the version does not
    /// belong to the post.
    pub async fn activate(
        conn: &mut PgConnection,
        post_id: DbId,
        version_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query(
            "UPDATE content_versions SET is_active = false \
             WHERE post_id = $1 AND is_active = true",
        )
        .bind(post_id)
        .execute(&mut *conn)
        .await?;

        let result = sqlx::query(
            "UPDATE content_versions SET is_active = true \
             WHERE id = $1 AND post_id = $2",
        )
        .bind(version_id)
        .bind(post_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set or clear a version's scheduled publication time.
    pub async fn set_scheduled_for(
        conn: &mut PgConnection,
        id: DbId,
        scheduled_for: Option<Timestamp>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE content_versions SET scheduled_for = $2 WHERE id = $1")
            .bind(id)
            .bind(scheduled_for)
            .execute(conn)
            .await?;
        Ok(())
    }

    // ── Scheduler queries ────────────────────────────────────────────

    /// Find scheduled versions whose publication time has arrived.
    pub async fn find_due_scheduled(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<ContentVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_versions
             WHERE workflow_status = $1
               AND scheduled_for IS NOT NULL
               AND scheduled_for <= $2
             ORDER BY scheduled_for"
        );
        sqlx::query_as::<_, ContentVersion>(&query)
            .bind(STATUS_SCHEDULED)
            .bind(now)
            .fetch_all(pool)
            .await
    }
}
