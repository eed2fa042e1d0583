//! Repository for the `settings` key/value store.

use sqlx::PgPool;

use crate::models::setting::Setting;

/// Column list for `settings` queries.
const COLUMNS: &str = "id, key, value, created_at, updated_at";

/// Provides get/set operations for JSON settings.
pub struct SettingRepo;

impl SettingRepo {
    /// Fetch a setting row by key.
    pub async fn get(pool: &PgPool, key: &str) -> Result<Option<Setting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM settings WHERE key = $1");
        sqlx::query_as::<_, Setting>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Fetch just the JSON value for a key.
    pub async fn get_value(
        pool: &PgPool,
        key: &str,
    ) -> Result<Option<serde_json::Value>, sqlx::Error> {
        sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Upsert a setting value, returning the stored row.
    pub async fn set(
        pool: &PgPool,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<Setting, sqlx::Error> {
        let query = format!(
            "INSERT INTO settings (key, value)
             VALUES ($1, $2)
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Setting>(&query)
            .bind(key)
            .bind(value)
            .fetch_one(pool)
            .await
    }

    /// Delete a setting by key. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM settings WHERE key = $1")
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
