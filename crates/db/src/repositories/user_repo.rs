//! Repository for the `users` table.

use sqlx::PgPool;
use slate_core::types::DbId;

use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, external_id, email, username, timezone, created_at, updated_at";

/// Provides lookups and profile updates for users.
pub struct UserRepo;

impl UserRepo {
    /// Find or create the user for an identity-provider subject.
    ///
    /// A non-`None` `email` replaces the stored one; `None` keeps it.
    pub async fn upsert_by_external_id(
        pool: &PgPool,
        external_id: &str,
        email: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (external_id, email)
             VALUES ($1, $2)
             ON CONFLICT (external_id) DO UPDATE
                SET email = COALESCE(EXCLUDED.email, users.email)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(external_id)
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email, ignoring case.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE LOWER(email) = LOWER($1) LIMIT 1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username. Usernames are stored lowercase.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Update the profile fields. Only non-`None` arguments are applied.
    ///
    /// A username clash surfaces as a unique violation on `uq_users_username`.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        username: Option<&str>,
        timezone: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                timezone = COALESCE($3, timezone)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(username)
            .bind(timezone)
            .fetch_optional(pool)
            .await
    }
}
