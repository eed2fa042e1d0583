//! Repository for the `users` and `roles` tables.

use sqlx::PgPool;

use pressroom_core::types::DbId;

use crate::models::user::{CreateUser, Role, User};

/// Column list for `users` queries.
const USER_COLUMNS: &str = "id, username, email, role_id, is_active, created_at, updated_at";

/// Column list for `roles` queries.
const ROLE_COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Provides lookup operations for users and roles.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, role_id)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(input.role_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a role by name.
    pub async fn find_role_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {ROLE_COLUMNS} FROM roles WHERE name = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a user's role name.
    pub async fn role_name_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT r.name FROM users u \
             JOIN roles r ON u.role_id = r.id \
             WHERE u.id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// List active users holding any of the given role names.
    ///
    /// Used by the notification router to find submit recipients.
    pub async fn list_active_by_role_names(
        pool: &PgPool,
        role_names: &[String],
    ) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.email, u.role_id, u.is_active, \
                    u.created_at, u.updated_at \
             FROM users u \
             JOIN roles r ON u.role_id = r.id \
             WHERE r.name = ANY($1) AND u.is_active = true \
             ORDER BY u.id",
        )
            .bind(role_names)
            .fetch_all(pool)
            .await
    }

    /// Soft-deactivate a user. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
